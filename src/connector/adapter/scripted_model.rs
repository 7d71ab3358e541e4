use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::{GenerationParams, GenerativeModel};
use crate::domain::DomainError;

/// Canned reply used by `serve --offline`.
pub const OFFLINE_REPLY: &str = "\
1. Hi! How has your week been so far?
2. I loved your travel photos, where was the beach one taken?
3. Would you like to grab a coffee together this weekend?";

/// In-process [`GenerativeModel`] that answers from a script.
///
/// Queued outcomes are consumed in order; once the queue is empty every call
/// returns the fallback reply. Used for offline serving and tests.
pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<String, DomainError>>>,
    fallback: String,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
    last_params: Mutex<Option<GenerationParams>>,
}

impl ScriptedModel {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: fallback.into(),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_params: Mutex::new(None),
        }
    }

    pub fn offline() -> Self {
        Self::new(OFFLINE_REPLY)
    }

    pub fn then_reply(self, text: impl Into<String>) -> Self {
        self.enqueue(Ok(text.into()))
    }

    pub fn then_fail(self, error: DomainError) -> Self {
        self.enqueue(Err(error))
    }

    fn enqueue(mut self, outcome: Result<String, DomainError>) -> Self {
        self.script.get_mut().push_back(outcome);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().await.clone()
    }

    pub async fn last_params(&self) -> Option<GenerationParams> {
        *self.last_params.lock().await
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, DomainError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_prompt.lock().await = Some(prompt.to_string());
        *self.last_params.lock().await = Some(*params);

        let outcome = self
            .script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()));
        debug!("ScriptedModel call {}: ok={}", call, outcome.is_ok());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn script_is_consumed_before_fallback() {
        let model = ScriptedModel::new("fallback")
            .then_reply("first")
            .then_fail(DomainError::transport("down"));
        let params = GenerationParams::default();

        assert_eq!(model.generate("p1", &params).await.unwrap(), "first");
        assert!(model.generate("p2", &params).await.is_err());
        assert_eq!(model.generate("p3", &params).await.unwrap(), "fallback");
        assert_eq!(model.generate("p4", &params).await.unwrap(), "fallback");

        assert_eq!(model.calls(), 4);
        assert_eq!(model.last_prompt().await.as_deref(), Some("p4"));
    }
}
