//! Network submission boundary: one JSON POST per attempt, 2xx means accepted.

use std::future::Future;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, info};

use crate::errors::SubmitError;
use crate::payload::SubmissionPayload;

pub trait SubmissionTransport: Send + Sync + 'static {
    fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> impl Future<Output = Result<(), SubmitError>> + Send;
}

/// POSTs the payload to the configured workflow endpoint. The response body is not read.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SubmitError> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(SubmitError::MissingEndpoint);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SubmissionTransport for HttpTransport {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), SubmitError> {
        let body = serde_json::to_vec(payload)?;
        debug!(endpoint = %self.endpoint, bytes = body.len(), "posting submission");

        let response = self.client.post(&self.endpoint).body(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
            });
        }
        info!(status = status.as_u16(), "submission accepted");
        Ok(())
    }
}
