//! Single-owner dashboard state
//!
//! Holds the current selection token and the merged bundles. It is mutated
//! only through `&mut self` by whoever drives the fetch cycle; every other
//! component reads it.

use super::bundle::{MetricResult, MetricsBundle};
use crate::model::ProjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Identifies one fetch cycle. Only the ticket of the latest selection is
/// current; results carrying an older ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchTicket {
    pub project_id: ProjectId,
    pub token: u64,
}

/// One settled metric of a fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricUpdate {
    pub ticket: FetchTicket,
    pub result: MetricResult,
}

/// All nine metrics of a fetch cycle, merged.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedBundle {
    pub ticket: FetchTicket,
    pub bundle: MetricsBundle,
    pub completed_at: DateTime<Utc>,
}

/// Outcome of offering a result to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The result belongs to a superseded selection and was discarded.
    Stale,
}

#[derive(Debug, Default)]
pub struct DashboardState {
    last_token: u64,
    current: Option<FetchTicket>,
    /// Bundle of the current cycle, possibly still pending.
    loading: Option<MetricsBundle>,
    /// Most recently completed bundle per project.
    bundles: HashMap<ProjectId, MetricsBundle>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch cycle for `project_id`, superseding any cycle in flight.
    pub fn select_project(&mut self, project_id: ProjectId) -> FetchTicket {
        self.last_token += 1;
        let ticket = FetchTicket {
            project_id,
            token: self.last_token,
        };
        if let Some(previous) = self.current.replace(ticket) {
            debug!(
                "Selection {} (project {}) superseded by {} (project {})",
                previous.token, previous.project_id, ticket.token, project_id
            );
        }
        self.loading = Some(MetricsBundle::pending(project_id));
        ticket
    }

    pub fn selected(&self) -> Option<FetchTicket> {
        self.current
    }

    pub fn selected_project(&self) -> Option<ProjectId> {
        self.current.map(|t| t.project_id)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.current == Some(ticket)
    }

    /// Apply a single settled metric of the current cycle.
    ///
    /// When the last pending slot settles the cycle's bundle becomes the
    /// project's merged bundle.
    pub fn apply_update(&mut self, update: MetricUpdate) -> ApplyOutcome {
        if !self.is_current(update.ticket) {
            debug!(
                "Discarding stale {} for project {} (token {})",
                update.result.kind(),
                update.ticket.project_id,
                update.ticket.token
            );
            return ApplyOutcome::Stale;
        }

        let Some(loading) = self.loading.as_mut() else {
            return ApplyOutcome::Stale;
        };
        loading.apply(update.result);

        if loading.is_complete() {
            self.bundles.insert(loading.project_id, loading.clone());
        }
        ApplyOutcome::Applied
    }

    /// Store a fully merged bundle if its cycle is still current.
    pub fn commit(&mut self, fetched: FetchedBundle) -> ApplyOutcome {
        if !self.is_current(fetched.ticket) {
            debug!(
                "Discarding stale bundle for project {} (token {})",
                fetched.ticket.project_id, fetched.ticket.token
            );
            return ApplyOutcome::Stale;
        }

        self.loading = Some(fetched.bundle.clone());
        self.bundles.insert(fetched.ticket.project_id, fetched.bundle);
        ApplyOutcome::Applied
    }

    /// Bundle of the current cycle, including still-pending slots.
    pub fn current_bundle(&self) -> Option<&MetricsBundle> {
        self.loading.as_ref()
    }

    /// Most recently completed bundle for `project_id`.
    pub fn bundle(&self, project_id: ProjectId) -> Option<&MetricsBundle> {
        self.bundles.get(&project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricState;

    fn update(ticket: FetchTicket, dsi: f64) -> MetricUpdate {
        MetricUpdate {
            ticket,
            result: MetricResult::SeverityIndex(MetricState::Ready(dsi)),
        }
    }

    #[test]
    fn test_select_issues_increasing_tokens() {
        let mut state = DashboardState::new();
        let a = state.select_project(1);
        let b = state.select_project(2);
        assert!(b.token > a.token);
        assert_eq!(state.selected_project(), Some(2));
        assert!(!state.is_current(a));
    }

    #[test]
    fn test_stale_update_is_discarded() {
        let mut state = DashboardState::new();
        let a = state.select_project(1);
        let b = state.select_project(2);

        assert_eq!(state.apply_update(update(a, 99.0)), ApplyOutcome::Stale);
        assert_eq!(state.apply_update(update(b, 10.0)), ApplyOutcome::Applied);

        let current = state.current_bundle().unwrap();
        assert_eq!(current.project_id, 2);
        assert_eq!(current.severity_index, MetricState::Ready(10.0));
        assert_eq!(current.pending_count(), 8);
        assert!(state.bundle(1).is_none());
        assert!(state.bundle(2).is_none());
    }

    #[test]
    fn test_reselecting_same_project_supersedes_old_cycle() {
        let mut state = DashboardState::new();
        let first = state.select_project(3);
        let second = state.select_project(3);

        let stale = FetchedBundle {
            ticket: first,
            bundle: MetricsBundle::pending(3),
            completed_at: Utc::now(),
        };
        assert_eq!(state.commit(stale), ApplyOutcome::Stale);

        let mut bundle = MetricsBundle::pending(3);
        bundle.severity_index = MetricState::Empty;
        let fresh = FetchedBundle {
            ticket: second,
            bundle: bundle.clone(),
            completed_at: Utc::now(),
        };
        assert_eq!(state.commit(fresh), ApplyOutcome::Applied);
        assert_eq!(state.bundle(3), Some(&bundle));
    }
}
