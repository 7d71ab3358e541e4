use super::{ChatMessage, ContextDraft, UserProfile};

/// In-memory state of one chat thread on the client.
///
/// Messages are kept in the order they were sent or received. Nothing here
/// is persisted; a fresh [`ContextDraft`] is taken whenever suggestions are
/// requested.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    profile: Option<UserProfile>,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
    }

    /// Record a message written by the local user. Blank text is ignored.
    pub fn send(&mut self, text: &str) -> bool {
        self.push(ChatMessage::user(text.trim()))
    }

    /// Record a message from the match. Blank text is ignored.
    pub fn receive(&mut self, text: &str) -> bool {
        self.push(ChatMessage::counterpart(text.trim()))
    }

    fn push(&mut self, message: ChatMessage) -> bool {
        if message.text.is_empty() {
            return false;
        }
        self.messages.push(message);
        true
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn draft(&self) -> ContextDraft {
        ContextDraft::new(self.profile.clone(), self.messages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MissingContextPolicy, Role};

    #[test]
    fn messages_keep_insertion_order_and_roles() {
        let mut conversation = Conversation::new();
        assert!(conversation.send("Hi!"));
        assert!(conversation.receive("Hey, nice to meet you"));
        assert!(conversation.send("  Coffee sometime?  "));

        let roles: Vec<Role> = conversation
            .messages()
            .iter()
            .map(ChatMessage::effective_role)
            .collect();
        assert_eq!(roles, [Role::User, Role::Counterpart, Role::User]);
        assert_eq!(conversation.messages()[2].text, "Coffee sometime?");
    }

    #[test]
    fn blank_messages_are_not_recorded() {
        let mut conversation = Conversation::new();
        assert!(!conversation.send("   "));
        assert!(!conversation.receive(""));
        assert!(conversation.is_empty());
    }

    #[test]
    fn draft_reflects_current_state() {
        let mut conversation =
            Conversation::new().with_profile(UserProfile::default().with_field("name", "Dohyun"));
        conversation.send("Hello");

        let context = conversation
            .draft()
            .resolve(MissingContextPolicy::Reject)
            .unwrap();
        assert_eq!(context.chat_history().len(), 1);
        assert_eq!(context.user_profile().get("name").unwrap(), "Dohyun");
    }

    #[test]
    fn fresh_conversation_cannot_be_resolved_strictly() {
        let draft = Conversation::new().draft();
        assert!(draft.resolve(MissingContextPolicy::Reject).is_err());
    }
}
