use reqwest::StatusCode;

/// Coarse classes every failure falls into. Callers decide what the user
/// sees from the class, not from the transport detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Missing, invalid or expired credential. Resolved by signing in again.
    Auth,
    /// Transport or server trouble. Shown once, never retried.
    Network,
    /// Rejected locally before any request went out.
    Validation,
    /// The server answered with an explicit error message.
    RemoteRejection,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("not authorized ({0})")]
    Unauthorized(StatusCode),
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Unauthorized(_) => FailureKind::Auth,
            ApiError::Rejected { .. } => FailureKind::RemoteRejection,
            ApiError::UrlParse(_) => FailureKind::Validation,
            ApiError::Reqwest(_) | ApiError::Decode(_) | ApiError::HttpStatus(_, _) => {
                FailureKind::Network
            }
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized(status)
            | ApiError::Rejected { status, .. }
            | ApiError::HttpStatus(status, _) => Some(*status),
            ApiError::Reqwest(e) => e.status(),
            ApiError::UrlParse(_) | ApiError::Decode(_) => None,
        }
    }
}
