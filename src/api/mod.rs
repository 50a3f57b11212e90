//! Upstream REST collaborator
//!
//! The aggregation core never talks HTTP directly. It asks a [`DefectApi`]
//! for an [`Endpoint`] and receives the service's `{data, message}` envelope,
//! or an [`ApiError`] when the request could not complete. Tests use
//! [`MockDefectApi`]; the CLI uses [`HttpDefectApi`].

use crate::error::ApiError;
use crate::model::ProjectId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub mod http;
pub mod mock;

pub use http::HttpDefectApi;
pub use mock::{Gate, MockDefectApi};

/// Logical upstream operations, keyed by project id where applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    Projects,
    DefectStatistics(ProjectId),
    DefectsByProject(ProjectId),
    SeveritySummary(ProjectId),
    SeverityIndex(ProjectId),
    DefectDensity(ProjectId),
    RemarkRatio(ProjectId),
    ReopenSummary(ProjectId),
    DefectTypeDistribution(ProjectId),
    DefectsByModule(ProjectId),
    ProjectCardColor(ProjectId),
}

impl Endpoint {
    /// The project this request belongs to, if any.
    pub fn project_id(&self) -> Option<ProjectId> {
        match *self {
            Endpoint::Projects => None,
            Endpoint::DefectStatistics(id)
            | Endpoint::DefectsByProject(id)
            | Endpoint::SeveritySummary(id)
            | Endpoint::SeverityIndex(id)
            | Endpoint::DefectDensity(id)
            | Endpoint::RemarkRatio(id)
            | Endpoint::ReopenSummary(id)
            | Endpoint::DefectTypeDistribution(id)
            | Endpoint::DefectsByModule(id)
            | Endpoint::ProjectCardColor(id) => Some(id),
        }
    }

    /// Path relative to the service base URL (no leading slash).
    pub fn path(&self) -> String {
        match *self {
            Endpoint::Projects => "api/v1/projects".to_string(),
            Endpoint::DefectStatistics(id) => format!("api/v1/defect-statistics/{id}"),
            Endpoint::DefectsByProject(id) => format!("api/v1/defects/project/{id}"),
            Endpoint::SeveritySummary(id) => {
                format!("api/v1/dashboard/defect_severity_summary/{id}")
            }
            Endpoint::SeverityIndex(id) => format!("api/v1/dashboard/dsi/{id}"),
            Endpoint::DefectDensity(id) => format!("api/v1/dashboard/defect-density/{id}"),
            Endpoint::RemarkRatio(id) => format!("api/v1/dashboard/remark-ratio/{id}"),
            Endpoint::ReopenSummary(id) => {
                format!("api/v1/dashboard/reopen-count-summary/{id}")
            }
            Endpoint::DefectTypeDistribution(id) => format!("api/v1/dashboard/defect-type/{id}"),
            Endpoint::DefectsByModule(id) => format!("api/v1/dashboard/defects-by-module/{id}"),
            Endpoint::ProjectCardColor(id) => {
                format!("api/v1/dashboard/project-card-color/{id}")
            }
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

/// Response envelope shared by every upstream endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiEnvelope {
    pub fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: Some(message.into()),
        }
    }

    /// True when `message` contains one of `sentinels`, compared case-insensitively.
    pub fn is_no_data(&self, sentinels: &[String]) -> bool {
        let Some(message) = &self.message else {
            return false;
        };
        let message = message.to_lowercase();
        sentinels
            .iter()
            .any(|s| !s.is_empty() && message.contains(&s.to_lowercase()))
    }
}

/// Trait for upstream access, the seam between the core and the network.
#[async_trait]
pub trait DefectApi: Send + Sync {
    /// Perform one request. An `Err` means the request did not complete;
    /// "no data" answers come back as an `Ok` envelope.
    async fn get(&self, endpoint: &Endpoint) -> Result<ApiEnvelope, ApiError>;
}

#[async_trait]
impl<T: DefectApi + ?Sized> DefectApi for std::sync::Arc<T> {
    async fn get(&self, endpoint: &Endpoint) -> Result<ApiEnvelope, ApiError> {
        (**self).get(endpoint).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_paths_carry_project_id() {
        assert_eq!(Endpoint::Projects.path(), "api/v1/projects");
        assert_eq!(
            Endpoint::SeveritySummary(7).path(),
            "api/v1/dashboard/defect_severity_summary/7"
        );
        assert_eq!(Endpoint::ProjectCardColor(3).project_id(), Some(3));
        assert_eq!(Endpoint::Projects.project_id(), None);
    }

    #[test]
    fn test_envelope_deserializes_with_missing_fields() {
        let env: ApiEnvelope = serde_json::from_value(json!({"data": [1, 2]})).unwrap();
        assert_eq!(env.data, Some(json!([1, 2])));
        assert_eq!(env.message, None);

        let env: ApiEnvelope = serde_json::from_value(json!({})).unwrap();
        assert_eq!(env, ApiEnvelope::default());
    }

    #[test]
    fn test_no_data_sentinel_is_case_insensitive() {
        let sentinels = vec!["No data found".to_string()];
        let env = ApiEnvelope::with_message("NO DATA FOUND for project 4");
        assert!(env.is_no_data(&sentinels));

        let env = ApiEnvelope::with_message("Success");
        assert!(!env.is_no_data(&sentinels));
        assert!(!ApiEnvelope::default().is_no_data(&sentinels));
    }
}
