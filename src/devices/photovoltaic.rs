use crate::config::{PvConfig, SeriesSource};
use crate::devices::types::{TimeSeries, TimedSeries};
use crate::error::ConfigError;

/// Local photovoltaic production read from a fixed time series.
///
/// `production_factor` rescales the whole profile, e.g. to size the array.
#[derive(Debug, Clone)]
pub struct Photovoltaic {
    production: TimeSeries,
}

impl Photovoltaic {
    /// Creates a PV source from raw production values and a scaling factor.
    pub fn new(production: Vec<f32>, production_factor: f32) -> Self {
        Self {
            production: TimeSeries::new(production, production_factor),
        }
    }

    /// Resolves the configured production series and builds the PV source.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the series reference cannot be resolved.
    pub fn from_config(config: &PvConfig) -> Result<Self, ConfigError> {
        let production = config.pv_production_ts.resolve("pv.pv_production_ts")?;
        Ok(Self::new(production, config.production_factor))
    }

    /// Energy produced at timestep `t`.
    pub fn get_power(&self, t: usize) -> f32 {
        self.production.get(t)
    }

    /// Scaled production series.
    pub fn production(&self) -> &TimeSeries {
        &self.production
    }

    /// Snapshot of the PV configuration.
    pub fn config(&self) -> PvConfig {
        PvConfig {
            pv_production_ts: SeriesSource::Values(self.production.raw().to_vec()),
            production_factor: self.production.factor(),
        }
    }
}

impl TimedSeries for Photovoltaic {
    fn length(&self) -> usize {
        self.production.len()
    }

    fn mean(&self) -> f32 {
        self.production.mean()
    }

    fn series_name(&self) -> &'static str {
        "pv"
    }
}
