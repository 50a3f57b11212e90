//! Semicircular gauge geometry

use serde::{Deserialize, Serialize};

/// Sweep of the dashboard's semicircular gauges.
pub const SEMICIRCLE_SWEEP_DEG: f64 = 180.0;

/// Clamp `value` into `[min, max]`.
///
/// NaN and degenerate domains (`max <= min`) resolve to `min`.
pub fn clamp_to_domain(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() || !(max > min) {
        return min;
    }
    value.max(min).min(max)
}

/// A numeric reading on a bounded gauge with colored zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeSpec {
    pub value: f64,
    pub domain_min: f64,
    pub domain_max: f64,
    /// Ascending boundaries; `n` boundaries delimit `n - 1` zones.
    pub zone_boundaries: Vec<f64>,
}

impl GaugeSpec {
    pub fn new(value: f64, domain_min: f64, domain_max: f64) -> Self {
        Self {
            value,
            domain_min,
            domain_max,
            zone_boundaries: Vec::new(),
        }
    }

    pub fn with_zones(mut self, boundaries: impl Into<Vec<f64>>) -> Self {
        self.zone_boundaries = boundaries.into();
        self
    }

    pub fn clamped_value(&self) -> f64 {
        clamp_to_domain(self.value, self.domain_min, self.domain_max)
    }

    /// Needle angle over the default semicircular sweep.
    pub fn needle_angle(&self) -> f64 {
        self.needle_angle_over(SEMICIRCLE_SWEEP_DEG)
    }

    /// Needle angle over an arbitrary sweep, 0° at `domain_min`.
    pub fn needle_angle_over(&self, sweep_deg: f64) -> f64 {
        if !(self.domain_max > self.domain_min) {
            return 0.0;
        }
        let fraction = (self.clamped_value() - self.domain_min) / (self.domain_max - self.domain_min);
        fraction * sweep_deg
    }

    /// Zone containing the clamped value.
    pub fn zone_index(&self) -> Option<usize> {
        zone_index(self.clamped_value(), &self.zone_boundaries)
    }
}

/// Linear needle angle for `value` on `[domain_min, domain_max]`.
pub fn needle_angle(value: f64, domain_min: f64, domain_max: f64) -> f64 {
    GaugeSpec::new(value, domain_min, domain_max).needle_angle()
}

/// Index of the zone containing `value`.
///
/// Zone `i` is `[b[i], b[i+1])`; the last zone is closed on both ends.
/// Returns `None` with fewer than two boundaries or when `value` lies outside
/// them.
pub fn zone_index(value: f64, boundaries: &[f64]) -> Option<usize> {
    if boundaries.len() < 2 || value.is_nan() {
        return None;
    }
    let last = boundaries.len() - 2;
    boundaries
        .windows(2)
        .enumerate()
        .find(|(i, w)| {
            let (lo, hi) = (w[0], w[1]);
            if *i == last {
                value >= lo && value <= hi
            } else {
                value >= lo && value < hi
            }
        })
        .map(|(i, _)| i)
}

/// Display colors for the density gauge zones (green, yellow, red).
pub const DENSITY_ZONE_COLORS: [&str; 3] = ["#10b981", "#f59e0b", "#dc2626"];

/// Renderable state of a gauge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeReading {
    pub spec: GaugeSpec,
    pub clamped_value: f64,
    pub needle_angle_deg: f64,
    pub zone: Option<usize>,
    pub color: Option<&'static str>,
}

impl GaugeReading {
    pub fn new(spec: GaugeSpec, zone_colors: &[&'static str]) -> Self {
        let zone = spec.zone_index();
        Self {
            clamped_value: spec.clamped_value(),
            needle_angle_deg: spec.needle_angle(),
            color: zone.and_then(|z| zone_colors.get(z).copied()),
            zone,
            spec,
        }
    }
}

/// The defect density gauge: 0–20 with zones at 7 and 13.
pub fn density_gauge(density: f64) -> GaugeReading {
    let spec = GaugeSpec::new(density, 0.0, 20.0).with_zones([0.0, 7.0, 13.0, 20.0]);
    GaugeReading::new(spec, &DENSITY_ZONE_COLORS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needle_angle_is_linear() {
        assert_eq!(needle_angle(0.0, 0.0, 20.0), 0.0);
        assert_eq!(needle_angle(10.0, 0.0, 20.0), 90.0);
        assert_eq!(needle_angle(20.0, 0.0, 20.0), 180.0);
    }

    #[test]
    fn test_needle_angle_clamps() {
        assert_eq!(needle_angle(35.0, 0.0, 20.0), 180.0);
        assert_eq!(needle_angle(-4.0, 0.0, 20.0), 0.0);
        assert_eq!(needle_angle(f64::NAN, 0.0, 20.0), 0.0);
    }

    #[test]
    fn test_degenerate_domain_pins_needle_at_zero() {
        assert_eq!(needle_angle(5.0, 10.0, 10.0), 0.0);
        assert_eq!(needle_angle(5.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_custom_sweep() {
        let spec = GaugeSpec::new(50.0, 0.0, 100.0);
        assert_eq!(spec.needle_angle_over(270.0), 135.0);
    }

    #[test]
    fn test_zone_bounds_lower_inclusive_upper_exclusive() {
        let b = [0.0, 7.0, 13.0, 20.0];
        assert_eq!(zone_index(0.0, &b), Some(0));
        assert_eq!(zone_index(6.99, &b), Some(0));
        assert_eq!(zone_index(7.0, &b), Some(1));
        assert_eq!(zone_index(13.0, &b), Some(2));
        assert_eq!(zone_index(20.0, &b), Some(2));
        assert_eq!(zone_index(20.5, &b), None);
        assert_eq!(zone_index(-1.0, &b), None);
        assert_eq!(zone_index(3.0, &[0.0]), None);
    }

    #[test]
    fn test_zone_uses_clamped_value() {
        let spec = GaugeSpec::new(99.0, 0.0, 20.0).with_zones([0.0, 7.0, 13.0, 20.0]);
        assert_eq!(spec.clamped_value(), 20.0);
        assert_eq!(spec.zone_index(), Some(2));
    }

    #[test]
    fn test_density_gauge_reading() {
        let reading = density_gauge(10.0);
        assert_eq!(reading.needle_angle_deg, 90.0);
        assert_eq!(reading.zone, Some(1));
        assert_eq!(reading.color, Some("#f59e0b"));
    }
}
