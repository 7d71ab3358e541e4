use async_trait::async_trait;

use crate::domain::DomainError;

/// Sampling settings passed with every generation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            max_output_tokens: 200,
        }
    }
}

/// A text-generation backend that turns a prompt into free text.
///
/// Implementors make exactly one attempt per call; retries and timeouts are
/// applied by the caller.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    fn model_name(&self) -> &str;

    /// Return the raw text produced for `prompt`. An empty string is a valid
    /// return value; interpreting it is the caller's job.
    async fn generate(&self, prompt: &str, params: &GenerationParams)
        -> Result<String, DomainError>;
}
