use tracing::debug;

use crate::config::BatteryConfig;
use crate::error::{Result, SimError};

/// A battery energy storage system with a soft operating band.
///
/// `Battery` stores energy between `low_capacity` and `high_capacity`.
/// Requests that would leave the band are clamped and the excess (or the
/// shortfall) is reported back so it can be priced as an overcharge cost.
///
/// # Sign Convention
/// - Positive energy: charging (energy moved into the battery)
/// - Negative energy: discharging (energy withdrawn from the battery)
///
/// The overflow returned by [`Battery::charge_discharge`] is asymmetric:
/// a charge reports `min(0, new_energy - high_capacity)`, a value `<= 0`,
/// while a discharge reports the shortfall below `low_capacity`, a value
/// `>= 0`. Multiplying either by the single positive `overcharge_penalty`
/// yields a cost whose sign tells which side of the band was involved.
#[derive(Debug, Clone)]
pub struct Battery {
    /// Total energy capacity.
    pub capacity: f32,

    /// Upper threshold of the soft operating band.
    pub high_capacity: f32,

    /// Lower threshold of the soft operating band.
    pub low_capacity: f32,

    /// Maximum energy transfer per timestep (advisory, not enforced).
    pub max_output: f32,

    /// Minimum energy transfer per timestep (advisory, not enforced).
    pub min_output: f32,

    /// Energy restored by [`Battery::reset`].
    pub initial_energy: f32,

    /// Cost coefficient applied to overcharge/undercharge energy.
    pub overcharge_penalty: f32,

    /// Energy currently stored.
    energy: f32,
}

impl Battery {
    /// Creates a battery from its configuration, starting at `initial_energy`.
    pub fn new(config: &BatteryConfig) -> Self {
        Self {
            capacity: config.capacity,
            high_capacity: config.high_capacity,
            low_capacity: config.low_capacity,
            max_output: config.max_output,
            min_output: config.min_output,
            initial_energy: config.initial_energy,
            overcharge_penalty: config.overcharge_penalty,
            energy: config.initial_energy,
        }
    }

    /// Restores the stored energy to `initial_energy`.
    ///
    /// Capacity and thresholds are left untouched.
    pub fn reset(&mut self) {
        self.energy = self.initial_energy;
    }

    /// Returns the currently stored energy.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] if the stored energy is negative.
    pub fn energy(&self) -> Result<f32> {
        if self.energy >= 0.0 {
            Ok(self.energy)
        } else {
            Err(SimError::InvalidState(format!(
                "battery energy is negative ({})",
                self.energy
            )))
        }
    }

    /// Returns the state of charge, between 0 (empty) and 1 (full).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] if the ratio leaves `[0, 1]`.
    pub fn state_of_charge(&self) -> Result<f32> {
        let soc = self.energy / self.capacity;
        if (0.0..=1.0).contains(&soc) {
            Ok(soc)
        } else {
            Err(SimError::InvalidState(format!(
                "state of charge not between 0 and 1: {soc} ({}/{})",
                self.energy, self.capacity
            )))
        }
    }

    /// Charges (`energy >= 0`) or discharges (`energy < 0`) the battery.
    ///
    /// The stored energy is clamped into the soft band and updated in both
    /// branches.
    ///
    /// # Returns
    ///
    /// - when charging: `min(0, new_energy - high_capacity)` (zero or negative)
    /// - when discharging: `max(0, low_capacity - new_energy)` (zero or positive)
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] if the stored energy was negative.
    pub fn charge_discharge(&mut self, energy: f32) -> Result<f32> {
        let new_energy = self.energy()? + energy;
        let overflow = if energy >= 0.0 {
            self.energy = new_energy.min(self.high_capacity);
            (new_energy - self.high_capacity).min(0.0)
        } else {
            self.energy = new_energy.max(self.low_capacity);
            (self.low_capacity - new_energy).max(0.0)
        };
        if new_energy > self.high_capacity || new_energy < self.low_capacity {
            debug!(
                requested = energy,
                new_energy,
                low = self.low_capacity,
                high = self.high_capacity,
                "battery request clamped to operating band"
            );
        }
        Ok(overflow)
    }

    /// Cost of operating outside the soft band: `overflow * overcharge_penalty`.
    pub fn get_overcharge_cost(&self, overflow: f32) -> f32 {
        overflow * self.overcharge_penalty
    }

    /// Snapshot of the live battery parameters.
    pub fn config(&self) -> BatteryConfig {
        BatteryConfig {
            capacity: self.capacity,
            high_capacity: self.high_capacity,
            low_capacity: self.low_capacity,
            max_output: self.max_output,
            min_output: self.min_output,
            initial_energy: self.initial_energy,
            overcharge_penalty: self.overcharge_penalty,
        }
    }

    /// Overwrites the stored energy without clamping.
    #[cfg(test)]
    pub(crate) fn force_energy(&mut self, energy: f32) {
        self.energy = energy;
    }
}
