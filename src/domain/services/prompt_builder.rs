use crate::domain::{ChatContext, ChatMessage, MAX_SUGGESTIONS};

/// Renders a [`ChatContext`] into the instruction sent to the generative model.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, context: &ChatContext) -> String {
        let profile = context.user_profile().to_compact_json();
        let history = Self::render_history(context.chat_history());

        format!(
            "You are a professional AI assistant for someone using a dating app.\n\
             Using the user profile and the recent chat history below, come up with \
             {MAX_SUGGESTIONS} natural conversation suggestions the user could send to their match.\n\
             \n\
             User profile: {profile}\n\
             Chat history:\n\
             {history}\n\
             \n\
             Based on this, write exactly {MAX_SUGGESTIONS} short messages to recommend to the user, \
             one per line, in the user's own voice.\n\
             Write each message as a single sentence and separate them with line breaks."
        )
    }

    /// One `role: text` line per message, oldest first.
    pub fn render_history(history: &[ChatMessage]) -> String {
        history
            .iter()
            .map(|msg| format!("{}: {}", msg.effective_role(), msg.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, UserProfile};

    fn context() -> ChatContext {
        ChatContext::new(
            UserProfile::default()
                .with_field("name", "Seoyeon")
                .with_field("hobbies", vec!["climbing", "jazz"]),
            vec![
                ChatMessage::new(None, "Hi! I saw you like jazz"),
                ChatMessage::counterpart("Yes! Do you go to live shows?"),
                ChatMessage::new(Some(Role::User), "Sometimes, mostly in Hongdae"),
            ],
        )
    }

    #[test]
    fn history_renders_role_prefixed_lines() {
        let rendered = PromptBuilder::render_history(context().chat_history());
        assert_eq!(
            rendered,
            "user: Hi! I saw you like jazz\n\
             counterpart: Yes! Do you go to live shows?\n\
             user: Sometimes, mostly in Hongdae"
        );
    }

    #[test]
    fn prompt_embeds_compact_profile_and_history() {
        let prompt = PromptBuilder::new().build(&context());
        assert!(prompt.contains(r#"User profile: {"hobbies":["climbing","jazz"],"name":"Seoyeon"}"#));
        assert!(prompt.contains("Chat history:\nuser: Hi! I saw you like jazz\n"));
        assert!(prompt.contains("exactly 3 short messages"));
        assert!(prompt.contains("one per line"));
    }

    #[test]
    fn empty_history_still_produces_a_prompt() {
        let ctx = ChatContext::new(UserProfile::default(), vec![]);
        let prompt = PromptBuilder::new().build(&ctx);
        assert!(prompt.contains("User profile: {}"));
        assert!(prompt.contains("Chat history:\n\n"));
    }
}
