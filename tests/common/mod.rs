//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use microgrid_sim::config::{
    BatteryConfig, GridConfig, LoadConfig, MicrogridConfig, PvConfig, SeriesSource,
};
use microgrid_sim::profile::hourly_variation;

/// Horizon of the end-to-end episode.
pub const EPISODE_STEPS: usize = 1000;

/// Default battery (1e5 capacity, band 20%–80%, starting at the lower threshold).
pub fn default_battery() -> BatteryConfig {
    let capacity = 1e5;
    BatteryConfig {
        capacity,
        high_capacity: 0.8 * capacity,
        low_capacity: 0.2 * capacity,
        max_output: 100.0,
        min_output: 20.0,
        initial_energy: 0.2 * capacity,
        overcharge_penalty: 1.0,
    }
}

/// Deterministic daily profiles over `n` steps with distinct penalties.
///
/// PV peaks above the load around noon so both balance signs occur.
pub fn daily_config(n: usize) -> MicrogridConfig {
    MicrogridConfig {
        max_timestep: n,
        overprod_penalty: 1.0,
        underprod_penalty: 3.0,
        battery: default_battery(),
        grid: GridConfig {
            import_prices: SeriesSource::Values(hourly_variation(10.0, 6.0, 24.0, 15.0, 3.0, n)),
            export_prices: SeriesSource::Values(hourly_variation(5.0, 1.0, 24.0, 15.0, 3.0, n)),
            import_price_factor: 1.0,
            export_price_factor: 1.0,
        },
        pv: PvConfig {
            pv_production_ts: SeriesSource::Values(
                hourly_variation(1500.0, 0.0, 24.0, 12.0, 0.0, n)
                    .into_iter()
                    .map(|v| v.max(0.0))
                    .collect(),
            ),
            production_factor: 1.0,
        },
        load: LoadConfig {
            load_ts: SeriesSource::Values(hourly_variation(1000.0, 300.0, 24.0, 12.0, 0.0, n)),
            load_factor: 1.0,
        },
    }
}

/// Constant series over `n` steps.
pub fn flat_config(n: usize, pv: f32, load: f32, import: f32, export: f32) -> MicrogridConfig {
    let mut cfg = daily_config(n);
    cfg.pv.pv_production_ts = SeriesSource::Values(vec![pv; n]);
    cfg.load.load_ts = SeriesSource::Values(vec![load; n]);
    cfg.grid.import_prices = SeriesSource::Values(vec![import; n]);
    cfg.grid.export_prices = SeriesSource::Values(vec![export; n]);
    cfg
}

/// Creates an empty scratch directory unique to this process and `name`.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("microgrid-sim-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
