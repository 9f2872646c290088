use crate::config::{GridConfig, SeriesSource};
use crate::devices::types::{TimeSeries, TimedSeries};
use crate::error::ConfigError;

/// The utility grid connection with time-varying import and export prices.
///
/// # Sign Convention
/// - Positive energy: buying (import), priced with `import_prices`
/// - Negative energy: selling (export), priced with `export_prices`
///
/// Selling yields a negative cost (revenue) as long as export prices are
/// non-negative. No rate limit is applied at this layer.
#[derive(Debug, Clone)]
pub struct Grid {
    import_prices: TimeSeries,
    export_prices: TimeSeries,
}

impl Grid {
    /// Creates a grid from raw price series and their scaling factors.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the two series differ in length.
    pub fn new(
        import_prices: Vec<f32>,
        export_prices: Vec<f32>,
        import_price_factor: f32,
        export_price_factor: f32,
    ) -> Result<Self, ConfigError> {
        if import_prices.len() != export_prices.len() {
            return Err(ConfigError::new(
                "grid.export_prices",
                format!(
                    "price series are not of the same length (import: {}, export: {})",
                    import_prices.len(),
                    export_prices.len()
                ),
            ));
        }
        Ok(Self {
            import_prices: TimeSeries::new(import_prices, import_price_factor),
            export_prices: TimeSeries::new(export_prices, export_price_factor),
        })
    }

    /// Resolves the configured series references and builds the grid.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a series cannot be resolved or the lengths differ.
    pub fn from_config(config: &GridConfig) -> Result<Self, ConfigError> {
        let import = config.import_prices.resolve("grid.import_prices")?;
        let export = config.export_prices.resolve("grid.export_prices")?;
        Self::new(
            import,
            export,
            config.import_price_factor,
            config.export_price_factor,
        )
    }

    /// Cost of exchanging `energy` with the grid at timestep `t`.
    ///
    /// Positive is a loss, negative is a gain.
    pub fn get_cost(&self, t: usize, energy: f32) -> f32 {
        if energy >= 0.0 {
            self.import_prices.get(t) * energy
        } else {
            self.export_prices.get(t) * energy
        }
    }

    /// Scaled import price at timestep `t`.
    pub fn import_price(&self, t: usize) -> f32 {
        self.import_prices.get(t)
    }

    /// Scaled export price at timestep `t`.
    pub fn export_price(&self, t: usize) -> f32 {
        self.export_prices.get(t)
    }

    /// Scaled import price series.
    pub fn import_prices(&self) -> &TimeSeries {
        &self.import_prices
    }

    /// Scaled export price series.
    pub fn export_prices(&self) -> &TimeSeries {
        &self.export_prices
    }

    /// Snapshot of the grid configuration with owned copies of the raw series.
    pub fn config(&self) -> GridConfig {
        GridConfig {
            import_prices: SeriesSource::Values(self.import_prices.raw().to_vec()),
            export_prices: SeriesSource::Values(self.export_prices.raw().to_vec()),
            import_price_factor: self.import_prices.factor(),
            export_price_factor: self.export_prices.factor(),
        }
    }
}

impl TimedSeries for Grid {
    fn length(&self) -> usize {
        self.import_prices.len()
    }

    /// Mean import price.
    fn mean(&self) -> f32 {
        self.import_prices.mean()
    }

    fn series_name(&self) -> &'static str {
        "grid"
    }
}
