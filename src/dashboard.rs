//! Landing-screen overview: every project with its risk tier

use crate::api::{DefectApi, Endpoint};
use crate::error::{Error, Result};
use crate::metrics::{adapters, settle, MetricState};
use crate::model::{Project, RiskTier};
use crate::orchestrator::DEFAULT_EMPTY_SENTINEL;
use crate::risk::{adapt_card_color, RiskAssessment, RiskClassifier, RiskSignals};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which tiers the overview shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskFilter {
    #[default]
    All,
    High,
    Medium,
    Low,
}

impl RiskFilter {
    pub fn matches(self, tier: RiskTier) -> bool {
        match self {
            RiskFilter::All => true,
            RiskFilter::High => tier == RiskTier::High,
            RiskFilter::Medium => tier == RiskTier::Medium,
            RiskFilter::Low => tier == RiskTier::Low,
        }
    }
}

impl FromStr for RiskFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(RiskFilter::All),
            "high" => Ok(RiskFilter::High),
            "medium" => Ok(RiskFilter::Medium),
            "low" => Ok(RiskFilter::Low),
            other => Err(Error::Config(format!(
                "Unknown risk filter '{other}' (expected all, high, medium or low)"
            ))),
        }
    }
}

impl fmt::Display for RiskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskFilter::All => "all",
            RiskFilter::High => "high",
            RiskFilter::Medium => "medium",
            RiskFilter::Low => "low",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TierCounts {
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }

    pub fn get(&self, tier: RiskTier) -> usize {
        match tier {
            RiskTier::High => self.high,
            RiskTier::Medium => self.medium,
            RiskTier::Low => self.low,
        }
    }
}

/// One project card on the overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectCard {
    pub project: Project,
    pub risk: RiskAssessment,
    pub label: &'static str,
    pub color: &'static str,
    /// Number of defects seen, when the defect list could be loaded.
    pub defect_count: Option<usize>,
}

impl ProjectCard {
    pub fn tier(&self) -> RiskTier {
        self.risk.tier
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOverview {
    pub cards: Vec<ProjectCard>,
    pub loaded_at: DateTime<Utc>,
}

impl DashboardOverview {
    pub fn counts(&self) -> TierCounts {
        self.cards
            .iter()
            .fold(TierCounts::default(), |mut counts, card| {
                match card.tier() {
                    RiskTier::High => counts.high += 1,
                    RiskTier::Medium => counts.medium += 1,
                    RiskTier::Low => counts.low += 1,
                }
                counts
            })
    }

    pub fn filter(&self, filter: RiskFilter) -> Vec<&ProjectCard> {
        self.cards
            .iter()
            .filter(|card| filter.matches(card.tier()))
            .collect()
    }
}

/// Loads the project list and classifies every project.
pub struct OverviewLoader {
    api: Arc<dyn DefectApi>,
    classifier: RiskClassifier,
    empty_sentinels: Vec<String>,
}

impl OverviewLoader {
    pub fn new(api: Arc<dyn DefectApi>, classifier: RiskClassifier) -> Self {
        Self {
            api,
            classifier,
            empty_sentinels: vec![DEFAULT_EMPTY_SENTINEL.to_string()],
        }
    }

    pub fn with_empty_sentinels(mut self, sentinels: Vec<String>) -> Self {
        self.empty_sentinels = sentinels;
        self
    }

    /// Fetch the project list.
    ///
    /// Unlike per-project metrics, a failure here has nothing to fall back
    /// on and is returned as an error. A "no data" answer is an empty list.
    pub async fn projects(&self) -> Result<Vec<Project>> {
        let envelope = self.api.get(&Endpoint::Projects).await?;
        match settle(Ok(envelope), &self.empty_sentinels, adapters::projects) {
            MetricState::Ready(projects) => Ok(projects),
            MetricState::Empty => Ok(Vec::new()),
            MetricState::Invalid(reason) | MetricState::Failed(reason) => Err(Error::Other(
                format!("Unexpected projects payload: {reason}"),
            )),
            MetricState::Pending => Ok(Vec::new()),
        }
    }

    async fn card(&self, project: Project) -> ProjectCard {
        let color_endpoint = Endpoint::ProjectCardColor(project.id);
        let defects_endpoint = Endpoint::DefectsByProject(project.id);
        let (color, defects) = futures::join!(
            self.api.get(&color_endpoint),
            self.api.get(&defects_endpoint)
        );

        let signals = match settle(color, &self.empty_sentinels, adapt_card_color) {
            MetricState::Ready(signals) => signals,
            MetricState::Failed(reason) | MetricState::Invalid(reason) => {
                warn!("No card color for project {}: {}", project.id, reason);
                RiskSignals::none()
            }
            _ => RiskSignals::none(),
        };

        let defects = match settle(defects, &self.empty_sentinels, adapters::defects) {
            MetricState::Ready(defects) => Some(defects),
            MetricState::Empty => Some(Vec::new()),
            MetricState::Failed(reason) | MetricState::Invalid(reason) => {
                warn!("No defect list for project {}: {}", project.id, reason);
                None
            }
            MetricState::Pending => None,
        };

        let risk = self
            .classifier
            .assess(&signals, defects.as_deref().unwrap_or_default());
        debug!(
            "Project {} classified {} ({:?})",
            project.id, risk.tier, risk.basis
        );

        ProjectCard {
            label: risk.tier.label(),
            color: risk.tier.color(),
            defect_count: defects.map(|d| d.len()),
            risk,
            project,
        }
    }

    /// Load and classify every project. Cards keep the project-list order.
    pub async fn load(&self) -> Result<DashboardOverview> {
        let projects = self.projects().await?;
        info!("Loading overview for {} projects", projects.len());

        let cards = join_all(projects.into_iter().map(|p| self.card(p))).await;
        Ok(DashboardOverview {
            cards,
            loaded_at: Utc::now(),
        })
    }
}
