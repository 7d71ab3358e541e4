use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::connector::api::{ApiError, Container};
use crate::domain::{ChatContext, ChatMessage, DomainError, SuggestionList, UserProfile};

const MISSING_FIELDS_MESSAGE: &str = "User profile and chat history are required.";

/// Wire payload of `POST /api/recommendation`.
///
/// Both fields are optional at the serde level so that absence can be
/// reported with a 400 and a readable message instead of a decode failure.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default)]
    pub user_profile: Option<Value>,
    #[serde(default)]
    pub chat_history: Option<Vec<ChatMessage>>,
}

impl RequestEnvelope {
    pub fn into_context(self) -> Result<ChatContext, DomainError> {
        let (Some(profile), Some(history)) = (self.user_profile, self.chat_history) else {
            return Err(DomainError::invalid_input(MISSING_FIELDS_MESSAGE));
        };
        Ok(ChatContext::new(UserProfile::from_value(profile)?, history))
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub suggestions: SuggestionList,
}

/// `POST /api/recommendation`
pub async fn recommend(
    State(container): State<Arc<Container>>,
    payload: Result<Json<RequestEnvelope>, JsonRejection>,
) -> Result<Json<SuggestionResponse>, ApiError> {
    let Json(envelope) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    debug!("Received request body: {:?}", envelope);

    let context = envelope.into_context()?;
    let suggestions = container.recommend_use_case().execute(&context).await?;

    debug!("Suggestions: {:?}", suggestions);
    Ok(Json(SuggestionResponse { suggestions }))
}
