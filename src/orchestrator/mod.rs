//! Metrics fetch orchestration
//!
//! A fetch cycle issues the nine per-project requests at once and polls them
//! together on the caller's task. Each response settles into its own slot, so
//! one failing endpoint never affects the others. Results are tagged with the
//! [`FetchTicket`] of the selection that started the cycle; the
//! [`DashboardState`] discards anything from a superseded selection.

pub mod bundle;
pub mod state;

pub use bundle::{MetricKind, MetricResult, MetricsBundle};
pub use state::{ApplyOutcome, DashboardState, FetchTicket, FetchedBundle, MetricUpdate};

use crate::api::DefectApi;
use crate::model::ProjectId;
use chrono::Utc;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, Stream, StreamExt};
use futures::FutureExt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Message the upstream service uses when a project has no data.
pub const DEFAULT_EMPTY_SENTINEL: &str = "No data found";

pub struct MetricsFetchOrchestrator {
    api: Arc<dyn DefectApi>,
    empty_sentinels: Vec<String>,
}

impl MetricsFetchOrchestrator {
    pub fn new(api: Arc<dyn DefectApi>) -> Self {
        Self {
            api,
            empty_sentinels: vec![DEFAULT_EMPTY_SENTINEL.to_string()],
        }
    }

    /// Replace the messages that mark an envelope as "no data".
    pub fn with_empty_sentinels(mut self, sentinels: Vec<String>) -> Self {
        self.empty_sentinels = sentinels;
        self
    }

    pub fn empty_sentinels(&self) -> &[String] {
        &self.empty_sentinels
    }

    fn request(&self, ticket: FetchTicket, kind: MetricKind) -> BoxFuture<'_, MetricUpdate> {
        async move {
            let endpoint = kind.endpoint(ticket.project_id);
            debug!("Requesting {} (token {})", endpoint, ticket.token);

            let response = self.api.get(&endpoint).await;
            if let Err(e) = &response {
                warn!(
                    "Failed to fetch {} for project {}: {}",
                    kind, ticket.project_id, e
                );
            }

            let result = MetricResult::settle(kind, response, &self.empty_sentinels);
            debug!("{} settled as {}", kind, result.state_name());
            MetricUpdate { ticket, result }
        }
        .boxed()
    }

    /// Issue all nine requests and yield each metric as it settles.
    ///
    /// Requests are polled concurrently on the task that drives the stream.
    /// A request that never completes keeps the stream open.
    pub fn fetch_updates(
        &self,
        ticket: FetchTicket,
    ) -> impl Stream<Item = MetricUpdate> + Send + '_ {
        MetricKind::ALL
            .into_iter()
            .map(|kind| self.request(ticket, kind))
            .collect::<FuturesUnordered<_>>()
    }

    /// Wait for all nine metrics and merge them into one bundle.
    pub async fn fetch_bundle(&self, ticket: FetchTicket) -> FetchedBundle {
        let mut bundle = MetricsBundle::pending(ticket.project_id);
        let mut updates = self.fetch_updates(ticket);
        while let Some(update) = updates.next().await {
            bundle.apply(update.result);
        }

        let failed = bundle.failed_count();
        if failed > 0 {
            warn!(
                "Project {}: {} of {} metrics failed",
                ticket.project_id,
                failed,
                MetricKind::ALL.len()
            );
        }
        info!("Fetched metrics for project {}", ticket.project_id);

        FetchedBundle {
            ticket,
            bundle,
            completed_at: Utc::now(),
        }
    }

    /// Select `project_id`, fetch its metrics and commit them.
    ///
    /// `state` stays borrowed until the cycle completes, so nothing can
    /// supersede it in flight. Callers that switch projects mid-cycle drive
    /// [`Self::fetch_updates`] themselves and feed
    /// [`DashboardState::apply_update`] or [`DashboardState::commit`].
    pub async fn refresh(&self, state: &mut DashboardState, project_id: ProjectId) -> ApplyOutcome {
        let ticket = state.select_project(project_id);
        let fetched = self.fetch_bundle(ticket).await;
        state.commit(fetched)
    }

    /// Drive a cycle, applying each metric to `state` as it settles.
    pub async fn stream_into(&self, state: &mut DashboardState, ticket: FetchTicket) -> usize {
        let mut applied = 0;
        let mut updates = self.fetch_updates(ticket);
        while let Some(update) = updates.next().await {
            if state.apply_update(update) == ApplyOutcome::Applied {
                applied += 1;
            }
        }
        applied
    }
}
