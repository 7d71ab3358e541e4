use std::fmt;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Model call timed out after {0:?}")]
    ModelTimeout(Duration),

    #[error("Model transport error: {0}")]
    ModelTransport(String),

    #[error("Model rejected the request with status {status}: {message}")]
    ModelRejected { status: u16, message: String },

    #[error("Malformed model response: {0}")]
    ModelMalformed(String),

    #[error("model returned no usable text")]
    EmptyModelResponse,

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`DomainError`], safe to expose to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    ModelUnavailable,
    ModelTimeout,
    ModelTransport,
    ModelRejected,
    ModelMalformed,
    ModelEmpty,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::ModelUnavailable => "model_unavailable",
            Self::ModelTimeout => "model_timeout",
            Self::ModelTransport => "model_transport",
            Self::ModelRejected => "model_rejected",
            Self::ModelMalformed => "model_malformed",
            Self::ModelEmpty => "model_empty",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::ModelTransport(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::ModelMalformed(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::ModelUnavailable(_) => ErrorKind::ModelUnavailable,
            Self::ModelTimeout(_) => ErrorKind::ModelTimeout,
            Self::ModelTransport(_) => ErrorKind::ModelTransport,
            Self::ModelRejected { .. } => ErrorKind::ModelRejected,
            Self::ModelMalformed(_) => ErrorKind::ModelMalformed,
            Self::EmptyModelResponse => ErrorKind::ModelEmpty,
            Self::IoError(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether a fresh attempt at the same model call might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ModelTimeout(_) | Self::ModelTransport(_) => true,
            Self::ModelRejected { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// A description that never includes upstream response bodies or
    /// library error text. Upstream detail stays in the logs.
    pub fn public_detail(&self) -> String {
        match self {
            Self::InvalidInput(msg) => msg.clone(),
            Self::ModelUnavailable(_) => "AI functionality is disabled on this server".to_string(),
            Self::ModelTimeout(after) => {
                format!("the AI model did not answer within {}s", after.as_secs())
            }
            Self::ModelTransport(_) => "the AI model could not be reached".to_string(),
            Self::ModelRejected { status, .. } => {
                format!("the AI model rejected the request (status {status})")
            }
            Self::ModelMalformed(_) => "the AI model returned an unreadable response".to_string(),
            Self::EmptyModelResponse => "model returned no usable text".to_string(),
            Self::IoError(_) | Self::Internal(_) => "internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_status_decides_transience() {
        let throttled = DomainError::ModelRejected {
            status: 429,
            message: "slow down".into(),
        };
        let unavailable = DomainError::ModelRejected {
            status: 503,
            message: "overloaded".into(),
        };
        let bad_request = DomainError::ModelRejected {
            status: 400,
            message: "bad key".into(),
        };

        assert!(throttled.is_transient());
        assert!(unavailable.is_transient());
        assert!(!bad_request.is_transient());
    }

    #[test]
    fn content_errors_are_not_transient() {
        assert!(!DomainError::EmptyModelResponse.is_transient());
        assert!(!DomainError::malformed("not json").is_transient());
        assert!(!DomainError::model_unavailable("no key").is_transient());
        assert!(DomainError::transport("connection reset").is_transient());
    }

    #[test]
    fn public_detail_hides_upstream_text() {
        let err = DomainError::ModelRejected {
            status: 401,
            message: "API key sk-secret is invalid".into(),
        };
        let detail = err.public_detail();
        assert!(detail.contains("401"));
        assert!(!detail.contains("sk-secret"));

        let err = DomainError::transport("dns error: api.internal.example");
        assert!(!err.public_detail().contains("internal.example"));
    }

    #[test]
    fn kinds_map_to_stable_names() {
        assert_eq!(DomainError::EmptyModelResponse.kind().as_str(), "model_empty");
        assert_eq!(
            DomainError::ModelTimeout(Duration::from_secs(5)).kind(),
            ErrorKind::ModelTimeout
        );
        assert_eq!(DomainError::internal("x").kind().to_string(), "internal");
    }
}
