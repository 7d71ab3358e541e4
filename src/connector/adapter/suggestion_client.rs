use std::error::Error as _;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::domain::{ChatContext, SuggestionList};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/api/recommendation";
/// Client-side wait in seconds. Must outlast the service's default
/// [`RetryPolicy::worst_case`](crate::application::RetryPolicy::worst_case).
pub const DEFAULT_TIMEOUT_SECS: u64 = 45;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-success status.
    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("request failed: {}", describe_transport(.0))]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Top-level reqwest message plus its source chain, so timeouts and
/// connection refusals are visible to the user.
fn describe_transport(err: &reqwest::Error) -> String {
    let mut message = if err.is_timeout() {
        format!("timed out ({err})")
    } else {
        err.to_string()
    };
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Where the suggestion service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Reads `WINGMAN_ENDPOINT`, falling back to [`DEFAULT_ENDPOINT`].
    pub fn from_env() -> Self {
        let endpoint =
            std::env::var("WINGMAN_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        Self::new(endpoint)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Deserialize)]
struct SuccessBody {
    #[serde(default)]
    suggestions: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Sends a [`ChatContext`] to the suggestion service and turns the reply into
/// something a chat screen can always render.
pub struct SuggestionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SuggestionClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch suggestions, never failing.
    ///
    /// Any transport, status or decoding failure is logged and returned as a
    /// single [`SuggestionList::diagnostic`] entry.
    pub async fn fetch_suggestions(&self, context: &ChatContext) -> SuggestionList {
        match self.try_fetch_suggestions(context).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                error!("Error calling recommendation API: {}", e);
                SuggestionList::diagnostic(e)
            }
        }
    }

    pub async fn try_fetch_suggestions(
        &self,
        context: &ChatContext,
    ) -> Result<SuggestionList, ClientError> {
        debug!(
            "Sending context to {} ({} history lines)",
            self.endpoint,
            context.chat_history().len()
        );

        let response = self.http.post(&self.endpoint).json(context).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("Server responded with status: {}", status.as_u16()));
            return Err(ClientError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SuccessBody =
            serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))?;
        let suggestions = SuggestionList::from_entries(parsed.suggestions.unwrap_or_default());

        info!("Received {} suggestions", suggestions.len());
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_local_service() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn default_timeout_outlasts_service_retries() {
        let service = crate::application::RetryPolicy::default();
        assert!(ClientConfig::default().timeout > service.worst_case());
    }

    #[test]
    fn service_error_displays_server_message() {
        let err = ClientError::Service {
            status: 400,
            message: "User profile and chat history are required.".into(),
        };
        assert_eq!(err.to_string(), "User profile and chat history are required.");
        assert_eq!(err.status(), Some(400));
        assert_eq!(ClientError::Parse("eof".into()).status(), None);
    }

    #[test]
    fn success_body_tolerates_missing_or_null_suggestions() {
        let body: SuccessBody = serde_json::from_str("{}").unwrap();
        assert!(body.suggestions.is_none());
        let body: SuccessBody = serde_json::from_str(r#"{"suggestions":null}"#).unwrap();
        assert!(body.suggestions.is_none());
    }
}
