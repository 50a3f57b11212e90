//! Per-project metrics bundle

use crate::api::{ApiEnvelope, Endpoint};
use crate::error::ApiError;
use crate::metrics::adapters::{self, DefectTypeDistribution, RemarkRatio};
use crate::metrics::severity::{self, SeveritySummary};
use crate::metrics::{settle, MetricState, ProportionalSeries};
use crate::model::{DefectRecord, ProjectId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The nine metrics fetched for every project, in merge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    DefectStatistics,
    Defects,
    SeveritySummary,
    SeverityIndex,
    DefectDensity,
    RemarkRatio,
    ReopenSummary,
    DefectTypes,
    DefectsByModule,
}

impl MetricKind {
    pub const ALL: [MetricKind; 9] = [
        MetricKind::DefectStatistics,
        MetricKind::Defects,
        MetricKind::SeveritySummary,
        MetricKind::SeverityIndex,
        MetricKind::DefectDensity,
        MetricKind::RemarkRatio,
        MetricKind::ReopenSummary,
        MetricKind::DefectTypes,
        MetricKind::DefectsByModule,
    ];

    pub fn endpoint(self, project_id: ProjectId) -> Endpoint {
        match self {
            MetricKind::DefectStatistics => Endpoint::DefectStatistics(project_id),
            MetricKind::Defects => Endpoint::DefectsByProject(project_id),
            MetricKind::SeveritySummary => Endpoint::SeveritySummary(project_id),
            MetricKind::SeverityIndex => Endpoint::SeverityIndex(project_id),
            MetricKind::DefectDensity => Endpoint::DefectDensity(project_id),
            MetricKind::RemarkRatio => Endpoint::RemarkRatio(project_id),
            MetricKind::ReopenSummary => Endpoint::ReopenSummary(project_id),
            MetricKind::DefectTypes => Endpoint::DefectTypeDistribution(project_id),
            MetricKind::DefectsByModule => Endpoint::DefectsByModule(project_id),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MetricKind::DefectStatistics => "defect_statistics",
            MetricKind::Defects => "defects",
            MetricKind::SeveritySummary => "severity_summary",
            MetricKind::SeverityIndex => "severity_index",
            MetricKind::DefectDensity => "defect_density",
            MetricKind::RemarkRatio => "remark_ratio",
            MetricKind::ReopenSummary => "reopen_summary",
            MetricKind::DefectTypes => "defect_types",
            MetricKind::DefectsByModule => "defects_by_module",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The settled state of one metric, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricResult {
    DefectStatistics(MetricState<Value>),
    Defects(MetricState<Vec<DefectRecord>>),
    SeveritySummary(MetricState<SeveritySummary>),
    SeverityIndex(MetricState<f64>),
    DefectDensity(MetricState<f64>),
    RemarkRatio(MetricState<RemarkRatio>),
    ReopenSummary(MetricState<ProportionalSeries>),
    DefectTypes(MetricState<DefectTypeDistribution>),
    DefectsByModule(MetricState<ProportionalSeries>),
}

impl MetricResult {
    /// Settle a raw response for `kind` through that kind's adapter.
    pub fn settle(
        kind: MetricKind,
        response: Result<ApiEnvelope, ApiError>,
        sentinels: &[String],
    ) -> Self {
        match kind {
            MetricKind::DefectStatistics => Self::DefectStatistics(settle(
                response,
                sentinels,
                adapters::defect_statistics,
            )),
            MetricKind::Defects => Self::Defects(settle(response, sentinels, adapters::defects)),
            MetricKind::SeveritySummary => {
                Self::SeveritySummary(settle(response, sentinels, severity::adapt))
            }
            MetricKind::SeverityIndex => {
                Self::SeverityIndex(settle(response, sentinels, adapters::severity_index))
            }
            MetricKind::DefectDensity => {
                Self::DefectDensity(settle(response, sentinels, adapters::defect_density))
            }
            MetricKind::RemarkRatio => {
                Self::RemarkRatio(settle(response, sentinels, adapters::remark_ratio))
            }
            MetricKind::ReopenSummary => {
                Self::ReopenSummary(settle(response, sentinels, adapters::reopen_summary))
            }
            MetricKind::DefectTypes => Self::DefectTypes(settle(
                response,
                sentinels,
                adapters::defect_type_distribution,
            )),
            MetricKind::DefectsByModule => {
                Self::DefectsByModule(settle(response, sentinels, adapters::defects_by_module))
            }
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            Self::DefectStatistics(_) => MetricKind::DefectStatistics,
            Self::Defects(_) => MetricKind::Defects,
            Self::SeveritySummary(_) => MetricKind::SeveritySummary,
            Self::SeverityIndex(_) => MetricKind::SeverityIndex,
            Self::DefectDensity(_) => MetricKind::DefectDensity,
            Self::RemarkRatio(_) => MetricKind::RemarkRatio,
            Self::ReopenSummary(_) => MetricKind::ReopenSummary,
            Self::DefectTypes(_) => MetricKind::DefectTypes,
            Self::DefectsByModule(_) => MetricKind::DefectsByModule,
        }
    }

    /// State name of the wrapped metric.
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::DefectStatistics(s) => s.state_name(),
            Self::Defects(s) => s.state_name(),
            Self::SeveritySummary(s) => s.state_name(),
            Self::SeverityIndex(s) => s.state_name(),
            Self::DefectDensity(s) => s.state_name(),
            Self::RemarkRatio(s) => s.state_name(),
            Self::ReopenSummary(s) => s.state_name(),
            Self::DefectTypes(s) => s.state_name(),
            Self::DefectsByModule(s) => s.state_name(),
        }
    }
}

/// Everything the detail view shows for one project.
///
/// Each metric has a fixed slot, so the merged result does not depend on
/// the order in which responses arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsBundle {
    pub project_id: ProjectId,
    pub defect_statistics: MetricState<Value>,
    pub defects: MetricState<Vec<DefectRecord>>,
    pub severity_summary: MetricState<SeveritySummary>,
    pub severity_index: MetricState<f64>,
    pub defect_density: MetricState<f64>,
    pub remark_ratio: MetricState<RemarkRatio>,
    pub reopen_summary: MetricState<ProportionalSeries>,
    pub defect_types: MetricState<DefectTypeDistribution>,
    pub defects_by_module: MetricState<ProportionalSeries>,
}

impl MetricsBundle {
    /// A bundle with every slot `Pending`.
    pub fn pending(project_id: ProjectId) -> Self {
        Self {
            project_id,
            defect_statistics: MetricState::Pending,
            defects: MetricState::Pending,
            severity_summary: MetricState::Pending,
            severity_index: MetricState::Pending,
            defect_density: MetricState::Pending,
            remark_ratio: MetricState::Pending,
            reopen_summary: MetricState::Pending,
            defect_types: MetricState::Pending,
            defects_by_module: MetricState::Pending,
        }
    }

    /// Store a settled metric in its slot.
    pub fn apply(&mut self, result: MetricResult) {
        match result {
            MetricResult::DefectStatistics(s) => self.defect_statistics = s,
            MetricResult::Defects(s) => self.defects = s,
            MetricResult::SeveritySummary(s) => self.severity_summary = s,
            MetricResult::SeverityIndex(s) => self.severity_index = s,
            MetricResult::DefectDensity(s) => self.defect_density = s,
            MetricResult::RemarkRatio(s) => self.remark_ratio = s,
            MetricResult::ReopenSummary(s) => self.reopen_summary = s,
            MetricResult::DefectTypes(s) => self.defect_types = s,
            MetricResult::DefectsByModule(s) => self.defects_by_module = s,
        }
    }

    /// State name of each slot, in merge order.
    pub fn states(&self) -> [(MetricKind, &'static str); 9] {
        [
            (MetricKind::DefectStatistics, self.defect_statistics.state_name()),
            (MetricKind::Defects, self.defects.state_name()),
            (MetricKind::SeveritySummary, self.severity_summary.state_name()),
            (MetricKind::SeverityIndex, self.severity_index.state_name()),
            (MetricKind::DefectDensity, self.defect_density.state_name()),
            (MetricKind::RemarkRatio, self.remark_ratio.state_name()),
            (MetricKind::ReopenSummary, self.reopen_summary.state_name()),
            (MetricKind::DefectTypes, self.defect_types.state_name()),
            (MetricKind::DefectsByModule, self.defects_by_module.state_name()),
        ]
    }

    pub fn pending_count(&self) -> usize {
        self.states().iter().filter(|(_, s)| *s == "pending").count()
    }

    pub fn failed_count(&self) -> usize {
        self.states().iter().filter(|(_, s)| *s == "failed").count()
    }

    /// True once every slot has settled.
    pub fn is_complete(&self) -> bool {
        self.pending_count() == 0
    }
}
