// Forwarding of autofill requests to the external autofill service

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AutofillRequest {
    #[serde(default)]
    pub link: Option<String>,
    /// Passed through untouched; the backend decides what it accepts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,
}

#[derive(Error, Debug)]
pub enum AutofillError {
    #[error("Autofill request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Autofill backend error: {0}")]
    BackendStatus(u16),
}

/// Thin JSON proxy in front of the autofill backend
#[derive(Debug, Clone)]
pub struct AutofillProxy {
    client: reqwest::Client,
    backend: String,
}

impl AutofillProxy {
    pub fn new(backend: impl Into<String>, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }

        Ok(Self {
            client: builder.build()?,
            backend: backend.into(),
        })
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// POST `{ link, index }` to the backend and hand back whatever JSON it answers with
    pub async fn forward(&self, link: &str, index: Option<Value>) -> Result<Value, AutofillError> {
        info!("Forwarding autofill for {} (index {:?})", link, index);

        let payload = AutofillRequest {
            link: Some(link.to_string()),
            index,
        };
        let response = self.client.post(&self.backend).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AutofillError::BackendStatus(status.as_u16()));
        }

        let body: Value = response.json().await?;
        debug!("Autofill backend answered for {}", link);
        Ok(body)
    }
}
