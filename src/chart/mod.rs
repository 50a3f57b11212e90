//! Chart geometry
//!
//! Converts normalized metrics into drawable primitives: pie slice angles,
//! gauge needle rotation and zone, thermometer fill and band. Rendering itself
//! belongs to the consumer.

pub mod gauge;
pub mod pie;
pub mod thermometer;

pub use gauge::{density_gauge, needle_angle, zone_index, GaugeReading, GaugeSpec};
pub use pie::{build_slices, Palette, SliceGeometry, DISTRIBUTION_PALETTE, MODULE_PALETTE};
pub use thermometer::{dsi_thermometer, fill_ratio, threshold_band, ThermometerReading};

use crate::metrics::ProportionalSeries;

/// Geometry front-end with a configurable gauge sweep.
#[derive(Debug, Clone, Copy)]
pub struct ChartGeometryEngine {
    pub gauge_sweep_deg: f64,
}

impl ChartGeometryEngine {
    pub fn new(gauge_sweep_deg: f64) -> Self {
        Self { gauge_sweep_deg }
    }

    pub fn build_slices(&self, series: &ProportionalSeries) -> Vec<SliceGeometry> {
        pie::build_slices(series)
    }

    pub fn needle_angle(&self, spec: &GaugeSpec) -> f64 {
        spec.needle_angle_over(self.gauge_sweep_deg)
    }

    pub fn zone_index(&self, spec: &GaugeSpec) -> Option<usize> {
        spec.zone_index()
    }

    pub fn fill_ratio(&self, value: f64, domain_min: f64, domain_max: f64) -> f64 {
        thermometer::fill_ratio(value, domain_min, domain_max)
    }
}

impl Default for ChartGeometryEngine {
    fn default() -> Self {
        Self::new(gauge::SEMICIRCLE_SWEEP_DEG)
    }
}
