//! reqwest-backed implementation of [`DefectApi`]

use super::{ApiEnvelope, DefectApi, Endpoint};
use crate::error::{ApiError, Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// HTTP client for the defect-tracking REST service
pub struct HttpDefectApi {
    client: Client,
    base_url: Url,
}

impl HttpDefectApi {
    /// Create a new client rooted at `base_url`
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        // Url::join drops the last path segment unless the base ends with '/'
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, endpoint: &Endpoint) -> std::result::Result<Url, ApiError> {
        self.base_url
            .join(&endpoint.path())
            .map_err(|e| ApiError::Transport(format!("invalid URL for {endpoint}: {e}")))
    }
}

#[async_trait]
impl DefectApi for HttpDefectApi {
    async fn get(&self, endpoint: &Endpoint) -> std::result::Result<ApiEnvelope, ApiError> {
        let url = self.url_for(endpoint)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        trace!("{} -> {}", endpoint, status);

        if status.is_success() {
            return Ok(response.json::<ApiEnvelope>().await?);
        }

        // The service answers unknown projects with 404 plus a message body
        if status == StatusCode::NOT_FOUND {
            if let Ok(envelope) = response.json::<ApiEnvelope>().await {
                if envelope.message.is_some() {
                    return Ok(envelope);
                }
            }
        }

        Err(ApiError::Status(status.as_u16()))
    }
}
