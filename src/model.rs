//! Core domain types shared by the aggregators, the risk classifier and the
//! orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream project identifier.
pub type ProjectId = i64;

/// A project as listed by the upstream service. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
}

/// Project-level risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::High, RiskTier::Medium, RiskTier::Low];

    /// Card caption used by the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            RiskTier::High => "High Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::Low => "Low Risk",
        }
    }

    /// Canonical card color for the tier.
    pub fn color(self) -> &'static str {
        match self {
            RiskTier::High => crate::risk::ColorTag::Red.hex(),
            RiskTier::Medium => crate::risk::ColorTag::Yellow.hex(),
            RiskTier::Low => crate::risk::ColorTag::Green.hex(),
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskTier::High => "high",
            RiskTier::Medium => "medium",
            RiskTier::Low => "low",
        };
        f.write_str(s)
    }
}

/// Severity level of an individual defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    High,
    Medium,
    Low,
}

impl SeverityLevel {
    /// Case-insensitive parse of an upstream severity tag.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "high" => Some(SeverityLevel::High),
            "medium" => Some(SeverityLevel::Medium),
            "low" => Some(SeverityLevel::Low),
            _ => None,
        }
    }

    /// Swatch used for severity legends.
    pub fn color(self) -> &'static str {
        match self {
            SeverityLevel::High => "#dc2626",
            SeverityLevel::Medium => "#f59e0b",
            SeverityLevel::Low => "#10b981",
        }
    }
}

/// Defect workflow statuses with a fixed slot in the severity cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusName {
    Reopen,
    New,
    Open,
    Fixed,
    Duplicate,
}

impl StatusName {
    /// Rendering order of the fixed layout.
    pub const ALL: [StatusName; 5] = [
        StatusName::Reopen,
        StatusName::New,
        StatusName::Open,
        StatusName::Fixed,
        StatusName::Duplicate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusName::Reopen => "REOPEN",
            StatusName::New => "NEW",
            StatusName::Open => "OPEN",
            StatusName::Fixed => "FIXED",
            StatusName::Duplicate => "DUPLICATE",
        }
    }

    /// Case-insensitive parse; surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|s| s.as_str() == upper)
    }

    pub fn color(self) -> &'static str {
        match self {
            StatusName::Reopen => "#f92309",
            StatusName::New => "#443eda",
            StatusName::Open => "#e4c73e",
            StatusName::Fixed => "#57dc1e",
            StatusName::Duplicate => "#676363",
        }
    }
}

impl fmt::Display for StatusName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw defect as returned by the per-project defect list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectRecord {
    pub id: Option<i64>,
    pub project_id: Option<ProjectId>,
    /// Status text exactly as upstream sent it.
    pub status: String,
}

impl DefectRecord {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            id: None,
            project_id: None,
            status: status.into(),
        }
    }

    /// The status if it is one of the fixed-layout statuses.
    pub fn status_name(&self) -> Option<StatusName> {
        StatusName::parse(&self.status)
    }
}
