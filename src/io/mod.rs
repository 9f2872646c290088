//! Reading series from disk and exporting simulation logs.

/// CSV export of energy and cost logs.
pub mod export;
/// Single-column CSV series loading.
pub mod series;
