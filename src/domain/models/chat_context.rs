use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::domain::DomainError;

/// Who wrote a chat line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    /// The match on the other side of the conversation. Older clients label
    /// these lines `model`.
    #[serde(alias = "model")]
    Counterpart,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Counterpart => "counterpart",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of chat history. An unset role renders as [`Role::User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub text: String,
}

impl ChatMessage {
    pub fn new(role: Option<Role>, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Some(Role::User), text)
    }

    pub fn counterpart(text: impl Into<String>) -> Self {
        Self::new(Some(Role::Counterpart), text)
    }

    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or_default()
    }
}

/// Opaque bag of profile fields (name, id, attributes).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(Map<String, Value>);

impl UserProfile {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Accepts only JSON objects; anything else is not a profile.
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(DomainError::invalid_input(format!(
                "userProfile must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_compact_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Profile and history sent to request suggestions. Built fresh for every
/// request and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    user_profile: UserProfile,
    chat_history: Vec<ChatMessage>,
}

impl ChatContext {
    pub fn new(user_profile: UserProfile, chat_history: Vec<ChatMessage>) -> Self {
        Self {
            user_profile,
            chat_history,
        }
    }

    pub fn user_profile(&self) -> &UserProfile {
        &self.user_profile
    }

    pub fn chat_history(&self) -> &[ChatMessage] {
        &self.chat_history
    }
}

/// What to do when a draft lacks a profile or history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingContextPolicy {
    /// Refuse to build a context; the caller sees a validation error.
    #[default]
    Reject,
    /// Fill the gaps with [`placeholder_profile`] / [`placeholder_history`].
    /// Meant for demos and local UI work only.
    Placeholder,
}

/// `{"userId": "guest_test", "name": "MockUser"}`
pub fn placeholder_profile() -> UserProfile {
    let Value::Object(fields) = json!({ "userId": "guest_test", "name": "MockUser" }) else {
        unreachable!("literal is an object");
    };
    UserProfile(fields)
}

/// A user asking for an opener and the other side acknowledging it.
pub fn placeholder_history() -> Vec<ChatMessage> {
    vec![
        ChatMessage::user(
            "Can you suggest a first line to start the conversation? Asking about the weather or how they're doing would be nice.",
        ),
        ChatMessage::counterpart("Sure, here are some good ways to start the conversation."),
    ]
}

/// A possibly incomplete context assembled from client-side state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextDraft {
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
}

impl ContextDraft {
    pub fn new(user_profile: Option<UserProfile>, chat_history: Vec<ChatMessage>) -> Self {
        Self {
            user_profile,
            chat_history,
        }
    }

    pub fn resolve(self, policy: MissingContextPolicy) -> Result<ChatContext, DomainError> {
        let user_profile = match (self.user_profile, policy) {
            (Some(profile), _) => profile,
            (None, MissingContextPolicy::Placeholder) => {
                warn!("userProfile missing, substituting placeholder profile");
                placeholder_profile()
            }
            (None, MissingContextPolicy::Reject) => {
                return Err(DomainError::invalid_input("userProfile is required"));
            }
        };

        let chat_history = if !self.chat_history.is_empty() {
            self.chat_history
        } else if policy == MissingContextPolicy::Placeholder {
            warn!("chatHistory missing or empty, substituting placeholder history");
            placeholder_history()
        } else {
            return Err(DomainError::invalid_input(
                "chatHistory must contain at least one message",
            ));
        };

        Ok(ChatContext::new(user_profile, chat_history))
    }
}
