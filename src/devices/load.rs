use crate::config::{LoadConfig, SeriesSource};
use crate::devices::types::{TimeSeries, TimedSeries};
use crate::error::ConfigError;

/// Local energy consumption read from a fixed time series.
#[derive(Debug, Clone)]
pub struct Load {
    demand: TimeSeries,
}

impl Load {
    /// Creates a load from raw demand values and a scaling factor.
    pub fn new(demand: Vec<f32>, load_factor: f32) -> Self {
        Self {
            demand: TimeSeries::new(demand, load_factor),
        }
    }

    /// Resolves the configured load series and builds the load.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the series reference cannot be resolved.
    pub fn from_config(config: &LoadConfig) -> Result<Self, ConfigError> {
        let demand = config.load_ts.resolve("load.load_ts")?;
        Ok(Self::new(demand, config.load_factor))
    }

    /// Energy required by the local network at timestep `t`.
    pub fn get_load(&self, t: usize) -> f32 {
        self.demand.get(t)
    }

    /// Largest scaled demand over the whole series.
    pub fn max(&self) -> f32 {
        self.demand.max()
    }

    /// Scaled demand series.
    pub fn demand(&self) -> &TimeSeries {
        &self.demand
    }

    /// Snapshot of the load configuration.
    pub fn config(&self) -> LoadConfig {
        LoadConfig {
            load_ts: SeriesSource::Values(self.demand.raw().to_vec()),
            load_factor: self.demand.factor(),
        }
    }
}

impl TimedSeries for Load {
    fn length(&self) -> usize {
        self.demand.len()
    }

    fn mean(&self) -> f32 {
        self.demand.mean()
    }

    fn series_name(&self) -> &'static str {
        "load"
    }
}
