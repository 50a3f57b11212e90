//! Thermometer (vertical bar) geometry

use super::gauge::clamp_to_domain;
use serde::Serialize;

/// Fill ratio of a bar for `value` on `[domain_min, domain_max]`, in `[0, 1]`.
pub fn fill_ratio(value: f64, domain_min: f64, domain_max: f64) -> f64 {
    if !(domain_max > domain_min) {
        return 0.0;
    }
    (clamp_to_domain(value, domain_min, domain_max) - domain_min) / (domain_max - domain_min)
}

/// Fill ratio on the default 0–100 domain.
pub fn fill_ratio_percent(value: f64) -> f64 {
    fill_ratio(value, 0.0, 100.0)
}

/// Band of `value` against descending thresholds.
///
/// Returns the index of the first threshold that `value` strictly exceeds,
/// or `thresholds.len()` (the lowest band) when it exceeds none. A value
/// equal to a threshold therefore lands in the band below it.
pub fn threshold_band(value: f64, descending_thresholds: &[f64]) -> usize {
    descending_thresholds
        .iter()
        .position(|t| value > *t)
        .unwrap_or(descending_thresholds.len())
}

/// Thresholds of the severity-index thermometer.
pub const DSI_THRESHOLDS: [f64; 3] = [75.0, 50.0, 25.0];

/// Band colors for the severity index, highest band first
/// (red, blue, yellow, green).
pub const DSI_BAND_COLORS: [&str; 4] = ["#dc2626", "#2563eb", "#fbbf24", "#10b981"];

/// Renderable state of a thermometer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThermometerReading {
    pub value: f64,
    pub fill_ratio: f64,
    pub band: usize,
    pub color: &'static str,
}

/// The defect severity index thermometer (0–100).
pub fn dsi_thermometer(dsi_percentage: f64) -> ThermometerReading {
    let band = threshold_band(clamp_to_domain(dsi_percentage, 0.0, 100.0), &DSI_THRESHOLDS);
    ThermometerReading {
        value: dsi_percentage,
        fill_ratio: fill_ratio_percent(dsi_percentage),
        band,
        color: DSI_BAND_COLORS[band],
    }
}
