//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

/// Load line color.
pub const LOAD_COLOR: Color = Color::Red;
/// PV production line color.
pub const PV_COLOR: Color = Color::Yellow;
/// Grid exchange line color.
pub const GRID_COLOR: Color = Color::Cyan;
/// Battery flow line color.
pub const BATTERY_COLOR: Color = Color::Green;
/// Step cost line color.
pub const COST_COLOR: Color = Color::Magenta;
/// SOC gauge color inside the soft band.
pub const SOC_HIGH: Color = Color::Green;
/// SOC gauge color at the band's edges.
pub const SOC_MID: Color = Color::Yellow;
/// SOC gauge color outside the band.
pub const SOC_LOW: Color = Color::Red;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Error message color.
pub const ERROR_FG: Color = Color::LightRed;

/// Returns a color for the state of charge relative to the soft band `(low, high)`.
pub fn soc_color(soc: f32, band: (f32, f32)) -> Color {
    let (low, high) = band;
    let margin = 0.02;
    if soc < low - f32::EPSILON || soc > high + f32::EPSILON {
        SOC_LOW
    } else if soc <= low + margin || soc >= high - margin {
        SOC_MID
    } else {
        SOC_HIGH
    }
}

/// Computes Y-axis bounds over several series with 10% padding.
pub fn auto_bounds_y(series: &[&[(f64, f64)]]) -> [f64; 2] {
    let all = series.iter().flat_map(|s| s.iter()).map(|&(_, y)| y);
    let min = all.clone().fold(f64::INFINITY, f64::min);
    let max = all.fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [-1.0, 1.0];
    }
    let range = (max - min).max(0.1);
    let pad = range * 0.1;
    [min - pad, max + pad]
}
