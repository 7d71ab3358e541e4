use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::connector::adapter::DEFAULT_TIMEOUT_SECS;
use crate::domain::{ChatMessage, ContextDraft, Conversation, Role};

#[derive(Subcommand)]
pub enum Commands {
    /// Run the suggestion service
    Serve {
        /// Interface to bind (overrides WINGMAN_HOST). The default only
        /// accepts local connections; phones on the LAN need `--host 0.0.0.0`
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides WINGMAN_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Answer with canned suggestions instead of calling the AI model
        #[arg(long)]
        offline: bool,
    },

    /// Ask a running service for suggestions and print them
    Suggest {
        /// Service URL (overrides WINGMAN_ENDPOINT)
        #[arg(long)]
        endpoint: Option<String>,

        /// JSON file holding `userProfile` and/or `chatHistory`
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Extra chat line, e.g. `user: hi` or `counterpart: hello`; repeatable
        #[arg(short, long = "message", value_parser = parse_message)]
        messages: Vec<ChatMessage>,

        /// Fill a missing profile or history with placeholder data
        #[arg(long)]
        placeholder: bool,

        /// Request timeout in seconds; keep it above the service's retry window
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,
    },
}

/// Parse `role: text`. Without a recognised role prefix the whole argument
/// is the text and the role stays unset.
pub fn parse_message(arg: &str) -> Result<ChatMessage, String> {
    let (role, text) = match arg.split_once(':') {
        Some((prefix, rest)) => match prefix.trim().to_ascii_lowercase().as_str() {
            "user" | "me" => (Some(Role::User), rest),
            "counterpart" | "them" | "model" => (Some(Role::Counterpart), rest),
            _ => (None, arg),
        },
        None => (None, arg),
    };

    let text = text.trim();
    if text.is_empty() {
        return Err("message text must not be empty".to_string());
    }
    Ok(ChatMessage::new(role, text))
}

/// Replay an optional context file plus extra lines into a [`Conversation`].
pub fn build_conversation(
    context_file: Option<&Path>,
    extra: Vec<ChatMessage>,
) -> Result<Conversation> {
    let draft = match context_file {
        Some(path) => load_draft(path)?,
        None => ContextDraft::default(),
    };

    let mut conversation = Conversation::new();
    if let Some(profile) = draft.user_profile {
        conversation.set_profile(profile);
    }
    for message in draft.chat_history.into_iter().chain(extra) {
        match message.effective_role() {
            Role::User => conversation.send(&message.text),
            Role::Counterpart => conversation.receive(&message.text),
        };
    }
    Ok(conversation)
}

pub fn load_draft(path: &Path) -> Result<ContextDraft> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read context file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse context file {}", path.display()))
}
