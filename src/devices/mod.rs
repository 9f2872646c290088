//! Physical component models of the microgrid.

/// Battery storage with a soft operating band.
pub mod battery;
/// Grid connection with import/export prices.
pub mod grid;
/// Local consumption profile.
pub mod load;
/// Photovoltaic production profile.
pub mod photovoltaic;
pub mod types;

// Re-export the main types for convenience
pub use battery::Battery;
pub use grid::Grid;
pub use load::Load;
pub use photovoltaic::Photovoltaic;
pub use types::TimeSeries;
pub use types::TimedSeries;
