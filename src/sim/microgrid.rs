//! The microgrid orchestrator: advances time, prices every step and keeps logs.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::MicrogridConfig;
use crate::devices::{Battery, Grid, Load, Photovoltaic, TimedSeries};
use crate::error::{ConfigError, Result, SimError};
use crate::sim::clock::Clock;
use crate::sim::logs::{LogReport, Logs};
use crate::sim::types::{ACTION_SIZE, Action, Costs, Observation, StepOutcome};

/// Number of indices that must stay readable ahead of `t`.
///
/// After a step the observation reads index `t + 1`, which has to be at most
/// `max_timestep - 1`.
const LOOKAHEAD: usize = 2;

/// A battery, a grid connection, PV production and a local load sharing one
/// horizon.
///
/// Each call to [`Microgrid::run_timestep`] advances `t` by one, moves the
/// requested energy through the battery and the grid, and prices the step:
///
/// - overcharge cost from the battery's soft band,
/// - grid cost from the import/export prices,
/// - error cost from the remaining balance `pv + grid - load - battery`.
///
/// The episode is done once `t >= max_timestep - 2`; further steps are
/// refused with [`SimError::HorizonExceeded`].
#[derive(Debug, Clone)]
pub struct Microgrid {
    battery: Battery,
    grid: Grid,
    pv: Photovoltaic,
    load: Load,
    overproduction_penalty: f32,
    underproduction_penalty: f32,
    clock: Clock,
    logging: bool,
    logs: Logs,
}

impl Microgrid {
    /// Builds a microgrid from its configuration.
    ///
    /// Series references are resolved (inline values or CSV files) and every
    /// series must hold exactly `max_timestep` values.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found by validation, series
    /// resolution or the horizon check.
    pub fn new(config: &MicrogridConfig) -> std::result::Result<Self, ConfigError> {
        if let Some(err) = config.validate().into_iter().next() {
            return Err(err);
        }

        let grid = Grid::from_config(&config.grid)?;
        let pv = Photovoltaic::from_config(&config.pv)?;
        let load = Load::from_config(&config.load)?;
        check_horizon(config.max_timestep, [&grid as &dyn TimedSeries, &pv, &load])?;

        let battery = Battery::new(&config.battery);
        info!(
            max_timestep = config.max_timestep,
            capacity = battery.capacity,
            initial_energy = battery.initial_energy,
            "microgrid created"
        );

        Ok(Self {
            battery,
            grid,
            pv,
            load,
            overproduction_penalty: config.overprod_penalty,
            underproduction_penalty: config.underprod_penalty,
            clock: Clock::new(config.max_timestep, LOOKAHEAD),
            logging: true,
            logs: Logs::default(),
        })
    }

    /// Enables or disables step logging (enabled by default).
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    /// Enables or disables step logging.
    pub fn set_logging(&mut self, logging: bool) {
        self.logging = logging;
    }

    /// Current timestep.
    pub fn t(&self) -> usize {
        self.clock.current()
    }

    /// Horizon length.
    pub fn max_timestep(&self) -> usize {
        self.clock.total()
    }

    /// Whether the episode reached its last steppable timestep.
    pub fn done(&self) -> bool {
        self.clock.is_done()
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn pv(&self) -> &Photovoltaic {
        &self.pv
    }

    pub fn load(&self) -> &Load {
        &self.load
    }

    /// Runs one timestep with an action in physical units.
    ///
    /// # Returns
    ///
    /// The observation for the next decision, the done flag and the costs
    /// of this step.
    ///
    /// # Errors
    ///
    /// - [`SimError::HorizonExceeded`] if the episode is already done.
    /// - [`SimError::InvalidState`] if the battery leaves its valid range.
    ///
    /// On error neither `t`, the battery nor the logs change.
    pub fn run_timestep(&mut self, action: Action) -> Result<StepOutcome> {
        if self.done() {
            warn!(
                t = self.t(),
                max_timestep = self.max_timestep(),
                "step refused, horizon exhausted"
            );
            return Err(SimError::HorizonExceeded {
                t: self.t(),
                max_timestep: self.max_timestep(),
            });
        }

        let t = self.t() + 1;
        let pv = self.pv.get_power(t);
        let load = self.load.get_load(t);
        let balance = pv + action.grid - load - action.battery;

        let mut battery = self.battery.clone();
        let overflow = battery.charge_discharge(action.battery)?;
        battery.state_of_charge()?;

        let costs = Costs {
            overcharge: battery.get_overcharge_cost(overflow),
            grid: self.grid.get_cost(t, action.grid),
            error: self.get_error_cost(balance),
        };

        self.battery = battery;
        self.clock.tick();

        if self.logging {
            self.log_energies(action.battery, action.grid, pv, load, Some(balance));
            self.log_costs(costs.overcharge, costs.grid, costs.error);
        }

        debug!(
            t,
            battery = action.battery,
            grid = action.grid,
            pv,
            load,
            balance,
            cost = costs.total(),
            "step"
        );

        Ok(StepOutcome {
            t,
            observation: self.observation()?,
            done: self.done(),
            costs,
        })
    }

    /// Rescales a normalized `[-1, 1]` action into physical units.
    ///
    /// Components outside `[-1, 1]` are clamped first.
    pub fn scale_action(&self, normalized: [f32; ACTION_SIZE]) -> Action {
        let min = self.min_actions();
        let max = self.max_actions();
        let scaled: [f32; ACTION_SIZE] = std::array::from_fn(|i| {
            let x = normalized[i].clamp(-1.0, 1.0);
            min[i] + (x + 1.0) / 2.0 * (max[i] - min[i])
        });
        Action::from(scaled)
    }

    /// Runs one timestep with a normalized `[-1, 1]` action.
    ///
    /// # Errors
    ///
    /// Same as [`Microgrid::run_timestep`].
    pub fn run_normalized_timestep(&mut self, normalized: [f32; ACTION_SIZE]) -> Result<StepOutcome> {
        let action = self.scale_action(normalized);
        self.run_timestep(action)
    }

    /// Observation at the current timestep.
    ///
    /// Prices, load and production are read one step ahead.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] if the battery state is invalid.
    pub fn observation(&self) -> Result<Observation> {
        let next = self.t() + 1;
        Ok(Observation([
            self.battery.state_of_charge()?,
            self.grid.import_price(next),
            self.grid.export_price(next),
            self.load.get_load(next),
            self.pv.get_power(next),
        ]))
    }

    /// Penalty on the energy balance: surplus at the overproduction rate,
    /// deficit at the underproduction rate.
    pub fn get_error_cost(&self, balance: f32) -> f32 {
        if balance >= 0.0 {
            balance * self.overproduction_penalty
        } else {
            balance * self.underproduction_penalty
        }
    }

    /// Appends one entry to every energy channel.
    ///
    /// When `balance` is `None` it is derived as `pv + grid - load - battery`.
    pub fn log_energies(&mut self, battery: f32, grid: f32, pv: f32, load: f32, balance: Option<f32>) {
        let balance = balance.unwrap_or(pv + grid - load - battery);
        self.logs.push_energies(balance, battery, grid, pv, load);
    }

    /// Appends one entry to every cost channel, total included.
    pub fn log_costs(&mut self, overcharge: f32, grid: f32, error: f32) {
        self.logs.push_costs(overcharge, grid, error);
    }

    /// Logged energies and costs.
    pub fn get_logs(&self) -> &Logs {
        &self.logs
    }

    /// Summary of the logs.
    pub fn show_logs(&self) -> LogReport {
        LogReport::from_logs(&self.logs)
    }

    /// Moves back to `t = 0` and restores the battery's initial energy.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] if the initial battery state is invalid.
    pub fn reset(&mut self, reset_logs: bool) -> Result<Observation> {
        self.clock.reset();
        self.battery.reset();
        if reset_logs {
            self.logs.clear();
        }
        info!(reset_logs, "microgrid reset");
        self.observation()
    }

    /// Resizes the battery to cover `hours` of average load, then resets.
    ///
    /// The initial state of charge and the soft band keep their fractions
    /// of the capacity. `max_output` is raised to the mean load if lower.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the resulting capacity is not
    /// positive and finite, or [`SimError::InvalidState`] if the resized
    /// battery would not hold a valid state of charge. The battery is left
    /// unchanged on any error.
    pub fn set_battery_from_duration(&mut self, hours: f32) -> Result<()> {
        let mean_load = self.load.mean();
        let capacity = mean_load * hours;
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(ConfigError::new(
                "battery.capacity",
                format!("duration {hours} h over mean load {mean_load} gives capacity {capacity}"),
            )
            .into());
        }

        // Fractions first so rounding can never push a level above capacity.
        let mut staged = self.battery.clone();
        let fraction = |energy: f32| energy / staged.capacity;
        let (initial, high, low) = (
            fraction(staged.initial_energy),
            fraction(staged.high_capacity),
            fraction(staged.low_capacity),
        );
        staged.capacity = capacity;
        staged.high_capacity = (high * capacity).min(capacity);
        staged.low_capacity = (low * capacity).min(staged.high_capacity);
        staged.initial_energy = (initial * capacity).min(capacity);
        staged.max_output = staged.max_output.max(mean_load);
        staged.reset();
        staged.state_of_charge()?;

        self.battery = staged;
        info!(hours, capacity, max_output = self.battery.max_output, "battery resized");

        self.reset(false).map(|_| ())
    }

    /// Lower bounds of the observation box.
    pub fn min_values(&self) -> Observation {
        Observation([
            0.0,
            self.grid.import_prices().min(),
            self.grid.export_prices().min(),
            self.load.demand().min(),
            self.pv.production().min(),
        ])
    }

    /// Upper bounds of the observation box.
    pub fn max_values(&self) -> Observation {
        Observation([
            1.0,
            self.grid.import_prices().max(),
            self.grid.export_prices().max(),
            self.load.demand().max(),
            self.pv.production().max(),
        ])
    }

    /// Upper bounds of a physical action: `[capacity, capacity + max load]`.
    pub fn max_actions(&self) -> [f32; ACTION_SIZE] {
        [
            self.battery.capacity,
            self.battery.capacity + self.load.max(),
        ]
    }

    /// Lower bounds of a physical action, the negated upper bounds.
    pub fn min_actions(&self) -> [f32; ACTION_SIZE] {
        self.max_actions().map(|m| -m)
    }

    /// Snapshot of the live configuration, raw series and factors included.
    pub fn config(&self) -> MicrogridConfig {
        MicrogridConfig {
            max_timestep: self.max_timestep(),
            overprod_penalty: self.overproduction_penalty,
            underprod_penalty: self.underproduction_penalty,
            battery: self.battery.config(),
            grid: self.grid.config(),
            pv: self.pv.config(),
            load: self.load.config(),
        }
    }

    /// Writes the configuration snapshot to `path` as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if serialization fails or
    /// [`SimError::Io`] if the file cannot be written.
    pub fn save_config(&self, path: &Path) -> Result<()> {
        let text = self.config().to_toml_string()?;
        fs::write(path, text)?;
        info!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

/// Checks that every series covers exactly `max_timestep` indices.
fn check_horizon<const N: usize>(
    max_timestep: usize,
    series: [&dyn TimedSeries; N],
) -> std::result::Result<(), ConfigError> {
    for s in series {
        if s.length() != max_timestep {
            return Err(ConfigError::new(
                s.series_name(),
                format!("length {} != max_timestep {max_timestep}", s.length()),
            ));
        }
    }
    Ok(())
}
