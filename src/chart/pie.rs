//! Pie slice geometry

use crate::metrics::ProportionalSeries;
use serde::{Deserialize, Serialize};

pub const FULL_CIRCLE_DEG: f64 = 360.0;

/// Arc of one series entry, clockwise from 0°.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliceGeometry {
    pub start_angle_deg: f64,
    pub end_angle_deg: f64,
    /// Index of the series entry; feed it to a [`Palette`].
    pub color_index: usize,
}

impl SliceGeometry {
    pub fn sweep_deg(&self) -> f64 {
        self.end_angle_deg - self.start_angle_deg
    }
}

/// Cumulative slices covering the circle exactly once.
///
/// Angles come from the running count sum divided by the total, so no
/// per-slice rounding accumulates and the final slice ends at exactly 360°.
/// Zero-count entries produce zero-width slices to keep indices aligned with
/// the series. An empty series yields no slices.
pub fn build_slices(series: &ProportionalSeries) -> Vec<SliceGeometry> {
    if series.is_empty || series.total <= 0.0 {
        return Vec::new();
    }

    let last = series.entries.len().saturating_sub(1);
    let mut running = 0.0;
    let mut start = 0.0;

    series
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            running += entry.count;
            let end = if index == last {
                FULL_CIRCLE_DEG
            } else {
                (running / series.total * FULL_CIRCLE_DEG).min(FULL_CIRCLE_DEG)
            };
            let slice = SliceGeometry {
                start_angle_deg: start,
                end_angle_deg: end,
                color_index: index,
            };
            start = end;
            slice
        })
        .collect()
}

/// Cyclic list of slice colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette(pub &'static [&'static str]);

impl Palette {
    pub fn color(&self, index: usize) -> &'static str {
        if self.0.is_empty() {
            return "#888888";
        }
        self.0[index % self.0.len()]
    }
}

/// Colors of the defects-by-module chart.
pub const MODULE_PALETTE: Palette = Palette(&[
    "#4285f4", "#34a853", "#fbbc04", "#ea4335", "#ff6d01", "#00bcd4", "#9c27b0", "#795548",
    "#607d8b", "#e91e63",
]);

/// Colors of the reopen-count and defect-type charts.
pub const DISTRIBUTION_PALETTE: Palette =
    Palette(&["#3b82f6", "#fbbf24", "#ef4444", "#10b981", "#f59e0b"]);
