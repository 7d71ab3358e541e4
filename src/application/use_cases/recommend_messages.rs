use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::application::{GenerationParams, GenerativeModel, RetryPolicy};
use crate::domain::{ChatContext, DomainError, PromptBuilder, SuggestionList};

/// Produces up to three suggested messages for a validated [`ChatContext`].
///
/// Holds no per-request state. When no model is configured every call fails
/// with [`DomainError::ModelUnavailable`].
pub struct RecommendMessagesUseCase {
    model: Option<Arc<dyn GenerativeModel>>,
    prompt_builder: PromptBuilder,
    params: GenerationParams,
    retry_policy: RetryPolicy,
}

impl RecommendMessagesUseCase {
    pub fn new(model: Option<Arc<dyn GenerativeModel>>) -> Self {
        Self {
            model,
            prompt_builder: PromptBuilder::new(),
            params: GenerationParams::default(),
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn is_model_configured(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.model_name())
    }

    pub async fn execute(&self, context: &ChatContext) -> Result<SuggestionList, DomainError> {
        let model: &dyn GenerativeModel = self.model.as_deref().ok_or_else(|| {
            DomainError::model_unavailable("no generative model credential is configured")
        })?;

        let prompt = self.prompt_builder.build(context);
        debug!(
            "Prompt for {} ({} history lines): {}",
            model.model_name(),
            context.chat_history().len(),
            prompt
        );

        let start_time = Instant::now();
        let prompt_ref = prompt.as_str();
        let params = &self.params;
        let text = self
            .retry_policy
            .run(move || model.generate(prompt_ref, params))
            .await?;

        let suggestions = SuggestionList::parse(&text)?;
        info!(
            "Generated {} suggestions in {:.2}s",
            suggestions.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(suggestions)
    }
}
