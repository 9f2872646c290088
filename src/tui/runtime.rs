//! Episode runner and TUI application state.

use std::collections::VecDeque;
use std::time::Instant;

use rand::{SeedableRng, rngs::StdRng};

use crate::config::MicrogridConfig;
use crate::env::GridEnv;
use crate::error::ConfigError;

/// Maximum number of history entries kept for the rolling chart.
const MAX_HISTORY: usize = 200;

/// Tick interval options in milliseconds (slowest → fastest).
const SPEED_LEVELS_MS: [u64; 6] = [500, 250, 100, 50, 20, 5];

/// Default speed index (100 ms).
const DEFAULT_SPEED_IDX: usize = 2;

/// One plotted step.
#[derive(Debug, Clone, Copy)]
pub struct HistoryPoint {
    pub t: usize,
    pub soc: f32,
    pub battery: f32,
    pub grid: f32,
    pub pv: f32,
    pub load: f32,
    pub balance: f32,
    pub cost: f32,
}

/// TUI application state.
///
/// Drives a [`GridEnv`] with uniformly sampled normalized actions.
pub struct App {
    env: GridEnv,
    seed: u64,
    rng: StdRng,
    /// Rolling history of steps for the chart.
    pub history: VecDeque<HistoryPoint>,
    /// Cumulated total cost since the last restart.
    pub cumulative_cost: f32,
    /// Whether the episode is paused.
    pub paused: bool,
    /// Current index into `SPEED_LEVELS_MS`.
    pub speed_idx: usize,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// When the last step was executed.
    pub last_tick: Instant,
    /// Name of the active configuration.
    pub name: String,
    /// Last step failure, shown in the status panel.
    pub error: Option<String>,
}

impl App {
    /// Creates an app for a configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the microgrid cannot be built.
    pub fn new(name: &str, config: &MicrogridConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            env: GridEnv::new(config)?,
            seed,
            rng: StdRng::seed_from_u64(seed),
            history: VecDeque::with_capacity(MAX_HISTORY),
            cumulative_cost: 0.0,
            paused: false,
            speed_idx: DEFAULT_SPEED_IDX,
            quit: false,
            last_tick: Instant::now(),
            name: name.to_string(),
            error: None,
        })
    }

    /// Runs one step with a random action if the episode is not finished.
    ///
    /// A failing step pauses the app and records the error.
    pub fn tick(&mut self) {
        if self.is_finished() {
            return;
        }
        let action = self.env.action_space().sample(&mut self.rng);
        let transition = match self.env.step(action) {
            Ok(tr) => tr,
            Err(e) => {
                self.error = Some(e.to_string());
                self.paused = true;
                return;
            }
        };
        let mg = self.env.microgrid();
        let logs = mg.get_logs();
        let last = |values: &[f32]| values.last().copied().unwrap_or_default();
        let point = HistoryPoint {
            t: mg.t(),
            soc: transition.observation.soc(),
            battery: last(&logs.energies.battery),
            grid: last(&logs.energies.grid),
            pv: last(&logs.energies.pv),
            load: last(&logs.energies.load),
            balance: last(&logs.energies.balance),
            cost: transition.costs.total(),
        };
        if self.history.len() >= MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(point);
        self.cumulative_cost += point.cost;
    }

    /// Toggles pause/resume.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Increases simulation speed (shorter tick interval).
    pub fn speed_up(&mut self) {
        if self.speed_idx + 1 < SPEED_LEVELS_MS.len() {
            self.speed_idx += 1;
        }
    }

    /// Decreases simulation speed (longer tick interval).
    pub fn speed_down(&mut self) {
        if self.speed_idx > 0 {
            self.speed_idx -= 1;
        }
    }

    /// Returns the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        SPEED_LEVELS_MS[self.speed_idx]
    }

    /// Switches to a preset, starting a fresh episode. Unknown names are ignored.
    pub fn switch_preset(&mut self, name: &str) {
        let Ok(config) = MicrogridConfig::from_preset(name, self.seed) else {
            return;
        };
        let Ok(env) = GridEnv::new(&config) else {
            return;
        };
        self.env = env;
        self.name = name.to_string();
        self.clear();
    }

    /// Restarts the episode with the same action sequence.
    pub fn restart(&mut self) {
        if let Err(e) = self.env.microgrid_mut().reset(true) {
            self.error = Some(e.to_string());
            return;
        }
        self.clear();
    }

    fn clear(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.history.clear();
        self.cumulative_cost = 0.0;
        self.paused = false;
        self.error = None;
    }

    /// Current timestep.
    pub fn t(&self) -> usize {
        self.env.microgrid().t()
    }

    /// Horizon of the episode.
    pub fn max_timestep(&self) -> usize {
        self.env.microgrid().max_timestep()
    }

    /// Current battery state of charge.
    pub fn battery_soc(&self) -> f32 {
        self.env
            .microgrid()
            .battery()
            .state_of_charge()
            .unwrap_or_default()
    }

    /// Battery soft band as fractions of capacity.
    pub fn soc_band(&self) -> (f32, f32) {
        let b = self.env.microgrid().battery();
        (b.low_capacity / b.capacity, b.high_capacity / b.capacity)
    }

    /// Returns `true` once the episode is done.
    pub fn is_finished(&self) -> bool {
        self.env.microgrid().done()
    }

    /// Returns the most recent step, if any.
    pub fn last_point(&self) -> Option<&HistoryPoint> {
        self.history.back()
    }
}
