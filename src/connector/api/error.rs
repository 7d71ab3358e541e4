use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::domain::DomainError;

const SERVICE_FAILURE_MESSAGE: &str = "Failed to get recommendation from AI service.";

/// Errors as the HTTP API reports them.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with `{ error }`.
    BadRequest(String),
    /// 500 with `{ error, details, kind }`.
    Service(DomainError),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(msg) => Self::BadRequest(msg),
            other => Self::Service(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::BadRequest(msg) => ErrorBody {
                error: msg.clone(),
                details: None,
                kind: None,
            },
            Self::Service(err) => ErrorBody {
                error: SERVICE_FAILURE_MESSAGE.to_string(),
                details: Some(err.public_detail()),
                kind: Some(err.kind().as_str()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::BadRequest(msg) => warn!("Rejected recommendation request: {}", msg),
            Self::Service(err) => error!("Error processing recommendation request: {}", err),
        }
        (self.status(), Json(self.body())).into_response()
    }
}
