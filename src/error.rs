//! Error types shared by the configuration layer and the simulation core.

use thiserror::Error;

/// Configuration error with field path and constraint description.
///
/// Raised while building a [`crate::sim::microgrid::Microgrid`] from its
/// configuration. Construction aborts on the first error; no partial
/// microgrid is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"grid.export_prices"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    /// Creates a new configuration error for the given field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by the simulation core.
#[derive(Debug, Error)]
pub enum SimError {
    /// The configuration is inconsistent or could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An internal invariant was violated (negative stored energy, SOC outside `[0, 1]`).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A step was requested after the episode reached its terminal timestep.
    #[error("timestep {t} is terminal for a horizon of {max_timestep} steps")]
    HorizonExceeded {
        /// Current step counter.
        t: usize,
        /// Configured horizon.
        max_timestep: usize,
    },

    /// Writing a configuration or log export failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the simulation core.
pub type Result<T, E = SimError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_names_field() {
        let e = ConfigError::new("pv.pv_production_ts", "length 9 != max_timestep 10");
        assert_eq!(
            e.to_string(),
            "config error: pv.pv_production_ts: length 9 != max_timestep 10"
        );
    }

    #[test]
    fn config_error_converts_into_sim_error() {
        let e: SimError = ConfigError::new("max_timestep", "must be >= 2").into();
        assert!(matches!(e, SimError::Config(ref c) if c.field == "max_timestep"));
    }

    #[test]
    fn horizon_error_mentions_both_numbers() {
        let e = SimError::HorizonExceeded {
            t: 8,
            max_timestep: 10,
        };
        let s = e.to_string();
        assert!(s.contains('8') && s.contains("10"));
    }
}
