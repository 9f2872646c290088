//! API response and query types.
//!
//! Field names follow the CSV log export columns for consistency across
//! export formats.

use serde::{Deserialize, Serialize};

use crate::sim::logs::Logs;

/// One logged step using the CSV export column names.
///
/// A channel that was not recorded for this step serializes as `null`.
#[derive(Debug, Serialize)]
pub struct LogRecord {
    /// Timestep reached by the step (1-based).
    pub step: usize,
    pub balance: Option<f32>,
    pub battery: Option<f32>,
    pub grid: Option<f32>,
    pub pv: Option<f32>,
    pub load: Option<f32>,
    pub cost_total: Option<f32>,
    pub cost_overcharge: Option<f32>,
    pub cost_grid: Option<f32>,
    pub cost_error: Option<f32>,
}

impl LogRecord {
    /// Builds the record of the `index`-th logged step (0-based).
    pub fn from_logs(logs: &Logs, index: usize) -> Self {
        let at = |values: &[f32]| values.get(index).copied();
        let e = &logs.energies;
        let c = &logs.costs;
        Self {
            step: index + 1,
            balance: at(&e.balance),
            battery: at(&e.battery),
            grid: at(&e.grid),
            pv: at(&e.pv),
            load: at(&e.load),
            cost_total: at(&c.total),
            cost_overcharge: at(&c.overcharge),
            cost_grid: at(&c.grid),
            cost_error: at(&c.error),
        }
    }
}

/// Optional range query parameters for the logs endpoint.
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    /// First step (inclusive).
    pub from: Option<usize>,
    /// Last step (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_record_maps_channels() {
        let mut logs = Logs::default();
        logs.push_energies(-1.0, 2.0, 3.0, 4.0, 10.0);
        logs.push_costs(0.5, 30.0, -2.0);

        let record = LogRecord::from_logs(&logs, 0);
        assert_eq!(record.step, 1);
        assert_eq!(record.balance, Some(-1.0));
        assert_eq!(record.load, Some(10.0));
        assert_eq!(record.cost_total, Some(28.5));
        assert_eq!(record.cost_error, Some(-2.0));
    }

    #[test]
    fn missing_channel_entries_are_none() {
        let mut logs = Logs::default();
        logs.push_energies(0.0, 0.0, 0.0, 0.0, 0.0);
        let record = LogRecord::from_logs(&logs, 0);
        assert_eq!(record.pv, Some(0.0));
        assert_eq!(record.cost_total, None);
    }
}
