use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use formscout_scanner::ScanError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// JSON envelope every failed request receives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<String>>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            logs: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// A required field was missing or empty
    #[error("{0}")]
    Validation(&'static str),

    #[error("{error}: {details}")]
    BadRequest { error: String, details: String },

    #[error("Form extraction failed: {0}")]
    FormExtraction(ScanError),

    #[error("Analysis failed: {0}")]
    LinkAnalysis(ScanError),

    #[error("Failed to process autofill request: {0}")]
    Autofill(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::FormExtraction(e) | ApiError::LinkAnalysis(e) if e.is_invalid_input() => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Validation(message) => ErrorBody::new(*message),
            ApiError::BadRequest { error, details } => {
                ErrorBody::new(error.clone()).with_details(details.clone())
            }
            ApiError::FormExtraction(e) if e.is_invalid_input() => {
                ErrorBody::new("Invalid URL").with_details(e.to_string())
            }
            ApiError::FormExtraction(e) => {
                ErrorBody::new("Form extraction failed").with_details(e.to_string())
            }
            ApiError::LinkAnalysis(e) => ErrorBody::new(format!("Analysis failed: {}", e)),
            ApiError::Autofill(_) => ErrorBody {
                error: "Failed to process autofill request".to_string(),
                details: None,
                logs: Some(vec!["❌ Autofill service temporarily unavailable".to_string()]),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("Rejected request: {}", self);
        }
        (status, Json(self.body())).into_response()
    }
}
