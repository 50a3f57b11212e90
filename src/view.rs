//! Render-ready projection of a metrics bundle
//!
//! Each chart keeps the state of the metric it is drawn from, so a view layer
//! can still tell "no data" from a failed request.

use crate::chart::{
    build_slices, density_gauge, dsi_thermometer, GaugeReading, Palette, ThermometerReading,
    DISTRIBUTION_PALETTE, MODULE_PALETTE,
};
use crate::metrics::{MetricState, ProportionalSeries, RemarkRatio, SeverityBucket, SeveritySummary};
use crate::model::{ProjectId, SeverityLevel, StatusName};
use crate::orchestrator::MetricsBundle;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub count: f64,
    pub percentage: f64,
    pub start_angle_deg: f64,
    pub end_angle_deg: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub total: f64,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn new(series: &ProportionalSeries, palette: Palette) -> Self {
        let slices = build_slices(series)
            .into_iter()
            .zip(&series.entries)
            .map(|(geometry, entry)| PieSlice {
                label: entry.label.clone(),
                count: entry.count,
                percentage: entry.percentage,
                start_angle_deg: geometry.start_angle_deg,
                end_angle_deg: geometry.end_angle_deg,
                color: palette.color(geometry.color_index),
            })
            .collect();
        Self {
            total: series.total,
            slices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCell {
    pub status: StatusName,
    pub count: u64,
    pub color: &'static str,
}

/// One severity card: bucket total plus the fixed status breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityCard {
    pub level: SeverityLevel,
    pub color: &'static str,
    pub total: u64,
    pub statuses: Vec<StatusCell>,
}

impl SeverityCard {
    fn new(level: SeverityLevel, bucket: &SeverityBucket) -> Self {
        Self {
            level,
            color: level.color(),
            total: bucket.total,
            statuses: bucket
                .fixed_layout()
                .into_iter()
                .map(|(status, count)| StatusCell {
                    status,
                    count,
                    color: status.color(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityPanel {
    pub total_defects: u64,
    pub cards: Vec<SeverityCard>,
}

impl SeverityPanel {
    pub fn new(summary: &SeveritySummary) -> Self {
        Self {
            total_defects: summary.total_defects,
            cards: [SeverityLevel::High, SeverityLevel::Medium, SeverityLevel::Low]
                .into_iter()
                .map(|level| SeverityCard::new(level, summary.bucket(level)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectView {
    pub project_id: ProjectId,
    pub severity: MetricState<SeverityPanel>,
    pub severity_index: MetricState<ThermometerReading>,
    pub defect_density: MetricState<GaugeReading>,
    pub remark_ratio: MetricState<RemarkRatio>,
    pub reopen: MetricState<PieChart>,
    pub defect_types: MetricState<PieChart>,
    pub modules: MetricState<PieChart>,
}

impl ProjectView {
    pub fn from_bundle(bundle: &MetricsBundle) -> Self {
        Self {
            project_id: bundle.project_id,
            severity: bundle.severity_summary.clone().map(|s| SeverityPanel::new(&s)),
            severity_index: bundle.severity_index.clone().map(dsi_thermometer),
            defect_density: bundle.defect_density.clone().map(density_gauge),
            remark_ratio: bundle.remark_ratio.clone(),
            reopen: bundle
                .reopen_summary
                .clone()
                .map(|s| PieChart::new(&s, DISTRIBUTION_PALETTE)),
            defect_types: bundle
                .defect_types
                .clone()
                .map(|d| PieChart::new(&d.series, DISTRIBUTION_PALETTE)),
            modules: bundle
                .defects_by_module
                .clone()
                .map(|s| PieChart::new(&s, MODULE_PALETTE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pie_chart_colors_follow_palette() {
        let series = ProportionalSeries::from_counts([("UI", 3.0), ("API", 1.0)]);
        let chart = PieChart::new(&series, MODULE_PALETTE);

        assert_eq!(chart.slices.len(), 2);
        assert_eq!(chart.slices[0].color, MODULE_PALETTE.color(0));
        assert_eq!(chart.slices[0].end_angle_deg, 270.0);
        assert_eq!(chart.slices[1].end_angle_deg, 360.0);
        assert_eq!(chart.slices[1].label, "API");
    }

    #[test]
    fn test_view_keeps_slot_states() {
        let mut bundle = MetricsBundle::pending(9);
        bundle.severity_index = MetricState::Ready(80.0);
        bundle.defect_density = MetricState::Empty;
        bundle.reopen_summary = MetricState::Failed("timeout".into());

        let view = ProjectView::from_bundle(&bundle);
        assert_eq!(view.severity_index.ready().map(|t| t.color), Some("#dc2626"));
        assert_eq!(view.defect_density, MetricState::Empty);
        assert_eq!(view.reopen, MetricState::Failed("timeout".into()));
        assert!(view.modules.is_pending());
    }

    #[test]
    fn test_severity_panel_orders_cards_high_to_low() {
        let panel = SeverityPanel::new(&SeveritySummary::default());
        let levels: Vec<_> = panel.cards.iter().map(|c| c.level).collect();
        assert_eq!(
            levels,
            vec![SeverityLevel::High, SeverityLevel::Medium, SeverityLevel::Low]
        );
        assert!(panel.cards.iter().all(|c| c.statuses.len() == 5));
    }
}
