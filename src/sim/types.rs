//! Core simulation types: actions, costs, observations and step outcomes.

use std::fmt;

use serde::Serialize;

/// Number of scalars in an [`Observation`].
pub const OBSERVATION_SIZE: usize = 5;

/// Number of scalars in an [`Action`].
pub const ACTION_SIZE: usize = 2;

/// Energy dispatch decision for one timestep, in physical units.
///
/// # Examples
///
/// ```
/// use microgrid_sim::sim::types::Action;
///
/// let a = Action::from([250.0, -40.0]);
/// assert_eq!(a.battery, 250.0);
/// assert_eq!(a.grid, -40.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Action {
    /// Energy moved into (+) or out of (-) the battery.
    pub battery: f32,
    /// Energy bought from (+) or sold to (-) the grid.
    pub grid: f32,
}

impl Action {
    /// Creates an action from battery and grid energies.
    pub fn new(battery: f32, grid: f32) -> Self {
        Self { battery, grid }
    }

    /// Action that neither touches the battery nor the grid.
    pub fn idle() -> Self {
        Self::default()
    }
}

impl From<[f32; ACTION_SIZE]> for Action {
    fn from([battery, grid]: [f32; ACTION_SIZE]) -> Self {
        Self { battery, grid }
    }
}

/// Costs incurred during one timestep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Costs {
    /// Cost of leaving the battery's soft band (sign-preserving).
    pub overcharge: f32,
    /// Cost (+) or revenue (-) of grid exchange.
    pub grid: f32,
    /// Penalty on the energy balance mismatch.
    pub error: f32,
}

impl Costs {
    /// Sum of the three cost components.
    pub fn total(&self) -> f32 {
        self.overcharge + self.grid + self.error
    }
}

/// State presented to a controller after a step.
///
/// Fixed order: `[soc, import_price, export_price, load, pv]`, where every
/// value but the state of charge refers to the next timestep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Observation(pub [f32; OBSERVATION_SIZE]);

impl Observation {
    /// Battery state of charge.
    pub fn soc(&self) -> f32 {
        self.0[0]
    }

    /// Upcoming import price.
    pub fn import_price(&self) -> f32 {
        self.0[1]
    }

    /// Upcoming export price.
    pub fn export_price(&self) -> f32 {
        self.0[2]
    }

    /// Upcoming load.
    pub fn load(&self) -> f32 {
        self.0[3]
    }

    /// Upcoming PV production.
    pub fn pv(&self) -> f32 {
        self.0[4]
    }

    /// The raw scalars, in observation order.
    pub fn as_array(&self) -> &[f32; OBSERVATION_SIZE] {
        &self.0
    }
}

/// Result of one successful call to `run_timestep`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepOutcome {
    /// Timestep reached by this step.
    pub t: usize,
    /// Observation for the next decision.
    pub observation: Observation,
    /// Whether the episode reached its horizon.
    pub done: bool,
    /// Costs incurred by this step.
    pub costs: Costs,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>4} | SoC={:.1}% | next: import={:.2} export={:.2} load={:.2} pv={:.2} \
             | cost={:.2} (overcharge={:.2} grid={:.2} error={:.2}) done={}",
            self.t,
            self.observation.soc() * 100.0,
            self.observation.import_price(),
            self.observation.export_price(),
            self.observation.load(),
            self.observation.pv(),
            self.costs.total(),
            self.costs.overcharge,
            self.costs.grid,
            self.costs.error,
            self.done,
        )
    }
}
