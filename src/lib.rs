//! Discrete-time microgrid simulator with cost accounting.
//!
//! A [`sim::Microgrid`] combines a battery, a grid connection, PV production
//! and a local load over a fixed horizon. Each step moves energy according
//! to an action, prices it and logs the flows. [`env::GridEnv`] exposes the
//! same model as an episodic environment for learning controllers.

/// REST API over a finished run.
#[cfg(feature = "api")]
pub mod api;
/// TOML configuration and presets.
pub mod config;
pub mod devices;
pub mod env;
pub mod error;
/// Series loading and log export.
pub mod io;
pub mod profile;
/// Microgrid orchestration, clock, logs and step types.
pub mod sim;
/// Live terminal UI.
#[cfg(feature = "tui")]
pub mod tui;
