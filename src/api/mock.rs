//! Scriptable [`DefectApi`] for tests

use super::{ApiEnvelope, DefectApi, Endpoint};
use crate::error::ApiError;
use crate::model::ProjectId;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// A latch that holds back mock responses until opened.
///
/// Clones share state, so a test can hand one copy to the mock and keep
/// another to release the responses at a chosen moment.
#[derive(Clone)]
pub struct Gate {
    tx: Arc<watch::Sender<bool>>,
}

impl Gate {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Release every response waiting on this gate, now and later.
    pub fn open(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_open(&self) -> bool {
        *self.tx.borrow()
    }

    async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        rx.wait_for(|open| *open).await.ok();
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

type Responses = Arc<Mutex<HashMap<Endpoint, Result<ApiEnvelope, ApiError>>>>;
type CalledEndpoints = Arc<Mutex<Vec<Endpoint>>>;

/// Mock implementation of `DefectApi` for testing
pub struct MockDefectApi {
    /// Canned response per endpoint
    pub responses: Responses,
    /// Gates holding back every endpoint of a project
    pub gates: Arc<Mutex<HashMap<ProjectId, Gate>>>,
    /// Gates holding back a single endpoint
    pub endpoint_gates: Arc<Mutex<HashMap<Endpoint, Gate>>>,
    /// Endpoints in the order they were requested
    pub called_endpoints: CalledEndpoints,
}

impl MockDefectApi {
    /// Create a new `MockDefectApi` with no responses configured
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            gates: Arc::new(Mutex::new(HashMap::new())),
            endpoint_gates: Arc::new(Mutex::new(HashMap::new())),
            called_endpoints: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the response returned for `endpoint`
    pub async fn set_response(&self, endpoint: Endpoint, response: Result<ApiEnvelope, ApiError>) {
        self.responses.lock().await.insert(endpoint, response);
    }

    /// Answer `endpoint` with `{data}`
    pub async fn set_data(&self, endpoint: Endpoint, data: Value) {
        self.set_response(endpoint, Ok(ApiEnvelope::with_data(data)))
            .await;
    }

    /// Answer `endpoint` with `{data: null, message}`
    pub async fn set_message(&self, endpoint: Endpoint, message: &str) {
        self.set_response(endpoint, Ok(ApiEnvelope::with_message(message)))
            .await;
    }

    /// Fail `endpoint` with a transport error
    pub async fn set_error(&self, endpoint: Endpoint, error: ApiError) {
        self.set_response(endpoint, Err(error)).await;
    }

    /// Hold every response for `project_id` until `gate` opens
    pub async fn set_gate(&self, project_id: ProjectId, gate: Gate) {
        self.gates.lock().await.insert(project_id, gate);
    }

    /// Hold the response for `endpoint` alone until `gate` opens
    pub async fn set_endpoint_gate(&self, endpoint: Endpoint, gate: Gate) {
        self.endpoint_gates.lock().await.insert(endpoint, gate);
    }

    /// Get the list of requested endpoints
    pub async fn get_called_endpoints(&self) -> Vec<Endpoint> {
        self.called_endpoints.lock().await.clone()
    }
}

impl Default for MockDefectApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DefectApi for MockDefectApi {
    async fn get(&self, endpoint: &Endpoint) -> Result<ApiEnvelope, ApiError> {
        self.called_endpoints.lock().await.push(*endpoint);

        let gate = match endpoint.project_id() {
            Some(id) => self.gates.lock().await.get(&id).cloned(),
            None => None,
        };
        if let Some(gate) = gate {
            gate.wait().await;
        }

        let endpoint_gate = self.endpoint_gates.lock().await.get(endpoint).cloned();
        if let Some(gate) = endpoint_gate {
            gate.wait().await;
        }

        self.responses
            .lock()
            .await
            .get(endpoint)
            .cloned()
            .unwrap_or_else(|| {
                Err(ApiError::Transport(format!(
                    "no mock response configured for {endpoint}"
                )))
            })
    }
}
