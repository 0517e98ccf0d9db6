use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ScanError {
    /// Upstream status code, when the failure came from a non-2xx response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ScanError::Status { status, .. } => Some(*status),
            ScanError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the caller supplied something unusable rather than the fetch failing
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ScanError::InvalidUrl(_))
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
