//! TOML-based microgrid configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::io::series::load_csv_series;
use crate::profile::{gaussian_noise, hourly_variation, with_uniform_noise};

/// Reference to a time series: inline values or a single-column CSV file.
///
/// In TOML, an array of numbers resolves to [`SeriesSource::Values`] and a
/// string resolves to [`SeriesSource::Csv`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesSource {
    /// Values given directly in the configuration.
    Values(Vec<f32>),
    /// Path to a `.csv` file holding one numeric column with a header row.
    Csv(PathBuf),
}

impl SeriesSource {
    /// Resolves the reference into owned values.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` on `field` if an inline value is not finite,
    /// or if the CSV file cannot be loaded or is not a single numeric column.
    pub fn resolve(&self, field: &str) -> Result<Vec<f32>, ConfigError> {
        match self {
            Self::Values(values) => match values.iter().position(|v| !v.is_finite()) {
                Some(i) => Err(ConfigError::new(
                    field,
                    format!("value {} at index {i} is not finite", values[i]),
                )),
                None => Ok(values.clone()),
            },
            Self::Csv(path) => load_csv_series(path).map_err(|e| {
                ConfigError::new(field, format!("cannot load \"{}\": {e}", path.display()))
            }),
        }
    }

    /// Makes a relative CSV path relative to `base` instead of the working directory.
    fn rebase(&mut self, base: &Path) {
        if let Self::Csv(path) = self {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

fn default_factor() -> f32 {
    1.0
}

/// Top-level microgrid configuration parsed from TOML.
///
/// Every field is required except the scaling factors and the battery's
/// `initial_energy`. Unknown fields are rejected. Load from TOML with
/// [`MicrogridConfig::from_toml_file`] or use one of the presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MicrogridConfig {
    /// Number of timesteps every series must cover.
    pub max_timestep: usize,
    /// Cost per unit of surplus energy.
    pub overprod_penalty: f32,
    /// Cost per unit of missing energy.
    pub underprod_penalty: f32,
    /// Battery storage parameters.
    pub battery: BatteryConfig,
    /// Grid price parameters.
    pub grid: GridConfig,
    /// Photovoltaic production parameters.
    pub pv: PvConfig,
    /// Local load parameters.
    pub load: LoadConfig,
}

/// Battery storage parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatteryConfig {
    /// Total energy capacity.
    pub capacity: f32,
    /// Upper threshold of the soft operating band.
    pub high_capacity: f32,
    /// Lower threshold of the soft operating band.
    pub low_capacity: f32,
    /// Maximum energy transfer per timestep (advisory).
    pub max_output: f32,
    /// Minimum energy transfer per timestep (advisory).
    pub min_output: f32,
    /// Stored energy at construction and after reset.
    #[serde(default)]
    pub initial_energy: f32,
    /// Cost coefficient for energy outside the soft band.
    pub overcharge_penalty: f32,
}

/// Grid price parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    /// Price paid per unit of imported energy, one per timestep.
    pub import_prices: SeriesSource,
    /// Price earned per unit of exported energy, one per timestep.
    pub export_prices: SeriesSource,
    /// Multiplier applied to import prices.
    #[serde(default = "default_factor")]
    pub import_price_factor: f32,
    /// Multiplier applied to export prices.
    #[serde(default = "default_factor")]
    pub export_price_factor: f32,
}

/// Photovoltaic production parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PvConfig {
    /// Energy produced per timestep.
    pub pv_production_ts: SeriesSource,
    /// Multiplier applied to production.
    #[serde(default = "default_factor")]
    pub production_factor: f32,
}

/// Local load parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadConfig {
    /// Energy required per timestep.
    pub load_ts: SeriesSource,
    /// Multiplier applied to the load.
    #[serde(default = "default_factor")]
    pub load_factor: f32,
}

/// Horizon of the realistic preset: one year of hourly steps.
const REALISTIC_STEPS: usize = 8760;

/// Horizon of the small preset: two days of hourly steps.
const SMALL_STEPS: usize = 48;

impl MicrogridConfig {
    /// Available preset names.
    pub const PRESETS: &'static [&'static str] = &["small", "realistic"];

    /// Returns the small preset: two days of smooth, noise-free hourly profiles.
    pub fn small() -> Self {
        let day = |max, min, time_max, time_min| {
            hourly_variation(max, min, 24.0, time_max, time_min, SMALL_STEPS)
        };
        let capacity = 1e4;
        Self {
            max_timestep: SMALL_STEPS,
            overprod_penalty: 1.0,
            underprod_penalty: 1.0,
            battery: BatteryConfig {
                capacity,
                high_capacity: 0.9 * capacity,
                low_capacity: 0.1 * capacity,
                max_output: 1000.0,
                min_output: 0.0,
                initial_energy: 0.5 * capacity,
                overcharge_penalty: 1.0,
            },
            grid: GridConfig {
                import_prices: SeriesSource::Values(day(10.0, 6.0, 15.0, 3.0)),
                export_prices: SeriesSource::Values(day(5.0, 1.0, 15.0, 3.0)),
                import_price_factor: 1.0,
                export_price_factor: 1.0,
            },
            pv: PvConfig {
                pv_production_ts: SeriesSource::Values(
                    day(100.0, 0.0, 12.0, 0.0)
                        .into_iter()
                        .map(|v| v.max(0.0))
                        .collect(),
                ),
                production_factor: 1.0,
            },
            load: LoadConfig {
                load_ts: SeriesSource::Values(day(1000.0, 300.0, 12.0, 0.0)),
                load_factor: 1.0,
            },
        }
    }

    /// Returns the realistic preset: a year of hourly profiles with seeded noise.
    pub fn realistic(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let day = |max, min, time_max, time_min| {
            hourly_variation(max, min, 24.0, time_max, time_min, REALISTIC_STEPS)
        };

        let noisy_prices = |base: Vec<f32>, rng: &mut StdRng| -> Vec<f32> {
            base.into_iter()
                .map(|p| (p + gaussian_noise(rng, 0.3)).max(0.0))
                .collect()
        };
        let import = noisy_prices(day(10.0, 6.0, 15.0, 3.0), &mut rng);
        let export = noisy_prices(day(5.0, 1.0, 15.0, 3.0), &mut rng);
        let pv = with_uniform_noise(&day(100.0, 50.0, 12.0, 0.0), -100.0, 0.0, &mut rng);
        let load = with_uniform_noise(&day(1000.0, 300.0, 12.0, 0.0), -500.0, 0.0, &mut rng);

        let capacity = 1e5;
        Self {
            max_timestep: REALISTIC_STEPS,
            overprod_penalty: 1.0,
            underprod_penalty: 1.0,
            battery: BatteryConfig {
                capacity,
                high_capacity: 0.8 * capacity,
                low_capacity: 0.2 * capacity,
                max_output: 100.0,
                min_output: 20.0,
                initial_energy: 0.2 * capacity,
                overcharge_penalty: 1.0,
            },
            grid: GridConfig {
                import_prices: SeriesSource::Values(import),
                export_prices: SeriesSource::Values(export),
                import_price_factor: 1.0,
                export_price_factor: 1.0,
            },
            pv: PvConfig {
                pv_production_ts: SeriesSource::Values(pv),
                production_factor: 1.0,
            },
            load: LoadConfig {
                load_ts: SeriesSource::Values(load),
                load_factor: 1.0,
            },
        }
    }

    /// Loads a configuration from a named preset.
    ///
    /// `seed` only affects presets with noisy profiles.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str, seed: u64) -> Result<Self, ConfigError> {
        match name {
            "small" => Ok(Self::small()),
            "realistic" => Ok(Self::realistic(seed)),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// Relative CSV series paths are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            config.rebase_series_paths(base);
        }
        Ok(config)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid, misses a required field
    /// or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Serializes the configuration to a TOML document.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    fn rebase_series_paths(&mut self, base: &Path) {
        self.grid.import_prices.rebase(base);
        self.grid.export_prices.rebase(base);
        self.pv.pv_production_ts.rebase(base);
        self.load.load_ts.rebase(base);
    }

    /// Validates scalar fields and returns a list of errors.
    ///
    /// Series lengths are checked when the microgrid resolves them.
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.max_timestep < 2 {
            errors.push(ConfigError::new(
                "max_timestep",
                "must be >= 2 (observations look one step ahead)",
            ));
        }
        for (field, value) in [
            ("overprod_penalty", self.overprod_penalty),
            ("underprod_penalty", self.underprod_penalty),
            ("battery.high_capacity", self.battery.high_capacity),
            ("battery.low_capacity", self.battery.low_capacity),
            ("battery.initial_energy", self.battery.initial_energy),
            ("battery.max_output", self.battery.max_output),
            ("battery.min_output", self.battery.min_output),
            ("battery.overcharge_penalty", self.battery.overcharge_penalty),
            ("grid.import_price_factor", self.grid.import_price_factor),
            ("grid.export_price_factor", self.grid.export_price_factor),
            ("pv.production_factor", self.pv.production_factor),
            ("load.load_factor", self.load.load_factor),
        ] {
            if !value.is_finite() {
                errors.push(ConfigError::new(field, "must be finite"));
            }
        }

        let bat = &self.battery;
        if !(bat.capacity.is_finite() && bat.capacity > 0.0) {
            errors.push(ConfigError::new("battery.capacity", "must be > 0"));
        }
        if bat.low_capacity < 0.0 || bat.low_capacity > bat.high_capacity {
            errors.push(ConfigError::new(
                "battery.low_capacity",
                "must be in [0, battery.high_capacity]",
            ));
        }
        if bat.high_capacity > bat.capacity {
            errors.push(ConfigError::new(
                "battery.high_capacity",
                "must be <= battery.capacity",
            ));
        }
        if !(0.0..=bat.capacity).contains(&bat.initial_energy) {
            errors.push(ConfigError::new(
                "battery.initial_energy",
                "must be in [0, battery.capacity]",
            ));
        }
        if bat.min_output > bat.max_output {
            errors.push(ConfigError::new(
                "battery.min_output",
                "must be <= battery.max_output",
            ));
        }

        errors
    }
}
