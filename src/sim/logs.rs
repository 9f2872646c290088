//! Per-step energy and cost accumulators and their summary report.

use std::fmt;

use serde::Serialize;

/// Energy channels recorded at every logged step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyChannel {
    /// Supply minus demand left after dispatch.
    Balance,
    /// Energy moved into (+) or out of (-) the battery.
    Battery,
    /// Energy bought (+) or sold (-).
    Grid,
    /// PV production.
    Pv,
    /// Local consumption.
    Load,
}

impl EnergyChannel {
    /// All channels, in export order.
    pub const ALL: [Self; 5] = [Self::Balance, Self::Battery, Self::Grid, Self::Pv, Self::Load];

    /// Column name used in reports and exports.
    pub fn name(self) -> &'static str {
        match self {
            Self::Balance => "balance",
            Self::Battery => "battery",
            Self::Grid => "grid",
            Self::Pv => "pv",
            Self::Load => "load",
        }
    }
}

/// Cost channels recorded at every logged step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostChannel {
    /// Sum of the other three.
    Total,
    /// Battery band penalty.
    Overcharge,
    /// Grid exchange cost.
    Grid,
    /// Balance mismatch penalty.
    Error,
}

impl CostChannel {
    /// All channels, in export order.
    pub const ALL: [Self; 4] = [Self::Total, Self::Overcharge, Self::Grid, Self::Error];

    /// Column name used in reports and exports.
    pub fn name(self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Overcharge => "overcharge",
            Self::Grid => "grid",
            Self::Error => "error",
        }
    }
}

/// Energy flows of every logged step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnergyLog {
    pub balance: Vec<f32>,
    pub battery: Vec<f32>,
    pub grid: Vec<f32>,
    pub pv: Vec<f32>,
    pub load: Vec<f32>,
}

impl EnergyLog {
    /// Values recorded on `channel`.
    pub fn channel(&self, channel: EnergyChannel) -> &[f32] {
        match channel {
            EnergyChannel::Balance => &self.balance,
            EnergyChannel::Battery => &self.battery,
            EnergyChannel::Grid => &self.grid,
            EnergyChannel::Pv => &self.pv,
            EnergyChannel::Load => &self.load,
        }
    }
}

/// Costs of every logged step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostLog {
    pub total: Vec<f32>,
    pub overcharge: Vec<f32>,
    pub grid: Vec<f32>,
    pub error: Vec<f32>,
}

impl CostLog {
    /// Values recorded on `channel`.
    pub fn channel(&self, channel: CostChannel) -> &[f32] {
        match channel {
            CostChannel::Total => &self.total,
            CostChannel::Overcharge => &self.overcharge,
            CostChannel::Grid => &self.grid,
            CostChannel::Error => &self.error,
        }
    }
}

/// Append-only record of energies and costs.
///
/// Energy and cost channels are appended independently; when written by
/// the microgrid they advance together, one entry per step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Logs {
    pub energies: EnergyLog,
    pub costs: CostLog,
}

impl Logs {
    /// Appends one entry to every energy channel.
    pub fn push_energies(&mut self, balance: f32, battery: f32, grid: f32, pv: f32, load: f32) {
        self.energies.balance.push(balance);
        self.energies.battery.push(battery);
        self.energies.grid.push(grid);
        self.energies.pv.push(pv);
        self.energies.load.push(load);
    }

    /// Appends one entry to every cost channel; the total is derived.
    pub fn push_costs(&mut self, overcharge: f32, grid: f32, error: f32) {
        self.costs.total.push(overcharge + grid + error);
        self.costs.overcharge.push(overcharge);
        self.costs.grid.push(grid);
        self.costs.error.push(error);
    }

    /// Number of logged steps (length of the longest channel group).
    pub fn len(&self) -> usize {
        self.energies.balance.len().max(self.costs.total.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties every channel.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Summary statistics of one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChannelStats {
    pub count: usize,
    pub sum: f32,
    pub mean: f32,
    pub min: f32,
    pub max: f32,
}

impl ChannelStats {
    /// Computes statistics over `values`; all zero when empty.
    pub fn from_values(values: &[f32]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let sum: f32 = values.iter().sum();
        Self {
            count: values.len(),
            sum,
            mean: sum / values.len() as f32,
            min: values.iter().copied().fold(f32::INFINITY, f32::min),
            max: values.iter().copied().fold(f32::NEG_INFINITY, f32::max),
        }
    }
}

/// Aggregate view of a [`Logs`] record.
///
/// Computed post-hoc from the logs so the report always agrees with the
/// recorded channels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogReport {
    /// Number of logged steps.
    pub steps: usize,
    /// Statistics per energy channel.
    pub energies: Vec<(EnergyChannel, ChannelStats)>,
    /// Statistics per cost channel.
    pub costs: Vec<(CostChannel, ChannelStats)>,
}

impl LogReport {
    /// Builds the report from a log record.
    pub fn from_logs(logs: &Logs) -> Self {
        Self {
            steps: logs.len(),
            energies: EnergyChannel::ALL
                .iter()
                .map(|&c| (c, ChannelStats::from_values(logs.energies.channel(c))))
                .collect(),
            costs: CostChannel::ALL
                .iter()
                .map(|&c| (c, ChannelStats::from_values(logs.costs.channel(c))))
                .collect(),
        }
    }

    /// Statistics of a cost channel.
    pub fn cost(&self, channel: CostChannel) -> ChannelStats {
        self.costs
            .iter()
            .find(|(c, _)| *c == channel)
            .map(|(_, s)| *s)
            .unwrap_or_default()
    }

    /// Statistics of an energy channel.
    pub fn energy(&self, channel: EnergyChannel) -> ChannelStats {
        self.energies
            .iter()
            .find(|(c, _)| *c == channel)
            .map(|(_, s)| *s)
            .unwrap_or_default()
    }
}

impl fmt::Display for LogReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Microgrid Report ({} steps) ---", self.steps)?;
        writeln!(
            f,
            "{:<12} {:>14} {:>12} {:>12} {:>12}",
            "channel", "sum", "mean", "min", "max"
        )?;
        writeln!(f, "energies:")?;
        for (channel, s) in &self.energies {
            writeln!(
                f,
                "  {:<10} {:>14.2} {:>12.2} {:>12.2} {:>12.2}",
                channel.name(),
                s.sum,
                s.mean,
                s.min,
                s.max
            )?;
        }
        write!(f, "costs:")?;
        for (channel, s) in &self.costs {
            write!(
                f,
                "\n  {:<10} {:>14.2} {:>12.2} {:>12.2} {:>12.2}",
                channel.name(),
                s.sum,
                s.mean,
                s.min,
                s.max
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_logs() -> Logs {
        let mut logs = Logs::default();
        logs.push_energies(1.0, 0.0, 2.0, 3.0, 4.0);
        logs.push_energies(-1.0, 0.0, 2.0, 3.0, 6.0);
        logs.push_costs(0.0, 10.0, 1.0);
        logs.push_costs(-5.0, 20.0, -2.0);
        logs
    }

    #[test]
    fn push_costs_derives_total() {
        let logs = sample_logs();
        assert_eq!(logs.costs.total, vec![11.0, 13.0]);
        assert_eq!(logs.len(), 2);
    }

    #[test]
    fn clear_empties_every_channel() {
        let mut logs = sample_logs();
        logs.clear();
        assert!(logs.is_empty());
        assert!(EnergyChannel::ALL.iter().all(|&c| logs.energies.channel(c).is_empty()));
    }

    #[test]
    fn channel_stats() {
        let s = ChannelStats::from_values(&[2.0, -1.0, 5.0]);
        assert_eq!(s.count, 3);
        assert_eq!(s.sum, 6.0);
        assert_eq!(s.mean, 2.0);
        assert_eq!(s.min, -1.0);
        assert_eq!(s.max, 5.0);
    }

    #[test]
    fn empty_stats_are_zero() {
        assert_eq!(ChannelStats::from_values(&[]), ChannelStats::default());
    }

    #[test]
    fn report_matches_logs() {
        let report = LogReport::from_logs(&sample_logs());
        assert_eq!(report.steps, 2);
        assert_eq!(report.cost(CostChannel::Total).sum, 24.0);
        assert_eq!(report.energy(EnergyChannel::Load).mean, 5.0);
    }

    #[test]
    fn report_display_lists_channels() {
        let text = LogReport::from_logs(&sample_logs()).to_string();
        assert!(text.starts_with("--- Microgrid Report (2 steps) ---"));
        for c in CostChannel::ALL {
            assert!(text.contains(c.name()));
        }
        assert!(text.contains("balance"));
    }
}
