//! Per-metric settlement markers

use crate::api::ApiEnvelope;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// State of one metric slot in a bundle.
///
/// `Empty` and `Failed` are kept apart on purpose: the first renders as
/// "no data available", the second as a failure notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum MetricState<T> {
    /// Request issued, not settled yet.
    Pending,
    Ready(T),
    /// Upstream explicitly reported no data.
    Empty,
    /// Payload arrived but had an unexpected shape.
    Invalid(String),
    /// Request could not complete.
    Failed(String),
}

impl<T> MetricState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, MetricState::Pending)
    }

    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            MetricState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MetricState<U> {
        match self {
            MetricState::Pending => MetricState::Pending,
            MetricState::Ready(value) => MetricState::Ready(f(value)),
            MetricState::Empty => MetricState::Empty,
            MetricState::Invalid(reason) => MetricState::Invalid(reason),
            MetricState::Failed(reason) => MetricState::Failed(reason),
        }
    }

    /// Short state name for logs and the CLI.
    pub fn state_name(&self) -> &'static str {
        match self {
            MetricState::Pending => "pending",
            MetricState::Ready(_) => "ready",
            MetricState::Empty => "empty",
            MetricState::Invalid(_) => "invalid",
            MetricState::Failed(_) => "failed",
        }
    }
}

impl<T> Default for MetricState<T> {
    fn default() -> Self {
        MetricState::Pending
    }
}

/// Settle a raw response and hand present data to `adapt`.
///
/// Transport errors become `Failed`; a sentinel message or a null `data`
/// becomes `Empty`; everything else is decided by the adapter.
pub fn settle<T>(
    response: Result<ApiEnvelope, ApiError>,
    sentinels: &[String],
    adapt: impl FnOnce(&Value) -> MetricState<T>,
) -> MetricState<T> {
    let envelope = match response {
        Ok(envelope) => envelope,
        Err(e) => return MetricState::Failed(e.to_string()),
    };

    if envelope.is_no_data(sentinels) {
        return MetricState::Empty;
    }

    match &envelope.data {
        None | Some(Value::Null) => MetricState::Empty,
        Some(data) => adapt(data),
    }
}
