use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::application::{
    GenerationParams, GenerativeModel, RecommendMessagesUseCase, RetryPolicy,
};
use crate::connector::adapter::{mask_secret, GeminiClient, ScriptedModel};
use crate::connector::adapter::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration, resolved once at startup.
///
/// | Variable                     | Default                                            |
/// |------------------------------|----------------------------------------------------|
/// | `WINGMAN_HOST`               | `127.0.0.1`                                        |
/// | `WINGMAN_PORT`               | `3000`                                             |
/// | `GEMINI_API_KEY`             | unset: AI disabled                                 |
/// | `GEMINI_MODEL`               | `gemini-2.0-flash-exp`                             |
/// | `GEMINI_BASE_URL`            | `https://generativelanguage.googleapis.com/v1beta` |
/// | `WINGMAN_TEMPERATURE`        | `0.8`                                              |
/// | `WINGMAN_MAX_OUTPUT_TOKENS`  | `200`                                              |
/// | `WINGMAN_MODEL_TIMEOUT_SECS` | `20`                                               |
/// | `WINGMAN_MODEL_RETRIES`      | `1`                                                |
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub generation: GenerationParams,
    pub retry_policy: RetryPolicy,
    /// Answer from [`ScriptedModel::offline`] instead of calling a real model.
    pub offline: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            generation: GenerationParams::default(),
            retry_policy: RetryPolicy::default(),
            offline: false,
        }
    }
}

impl ContainerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let generation = GenerationParams {
            temperature: env_parse("WINGMAN_TEMPERATURE", defaults.generation.temperature),
            max_output_tokens: env_parse(
                "WINGMAN_MAX_OUTPUT_TOKENS",
                defaults.generation.max_output_tokens,
            ),
        };
        let retry_policy = RetryPolicy::new(
            Duration::from_secs(env_parse(
                "WINGMAN_MODEL_TIMEOUT_SECS",
                defaults.retry_policy.attempt_timeout().as_secs(),
            )),
            env_parse("WINGMAN_MODEL_RETRIES", defaults.retry_policy.max_retries()),
        );

        Self {
            host: std::env::var("WINGMAN_HOST").unwrap_or(defaults.host),
            port: env_parse("WINGMAN_PORT", defaults.port),
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            generation,
            retry_policy,
            offline: false,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_parse<T: FromStr + Copy + std::fmt::Debug>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {:?}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Wires the model adapter into the use case served by the API.
pub struct Container {
    recommend_use_case: Arc<RecommendMessagesUseCase>,
}

impl Container {
    pub fn new(config: &ContainerConfig) -> Self {
        let model: Option<Arc<dyn GenerativeModel>> = if config.offline {
            info!("Using scripted offline model");
            Some(Arc::new(ScriptedModel::offline()))
        } else if let Some(key) = config.api_key.as_deref() {
            info!(
                "Using {} via {} (key {})",
                config.model,
                config.base_url,
                mask_secret(key)
            );
            Some(Arc::new(GeminiClient::new(
                key,
                config.model.as_str(),
                config.base_url.as_str(),
            )))
        } else {
            warn!("GEMINI_API_KEY is missing. AI functionality disabled.");
            None
        };

        Self::with_model(model, config.generation, config.retry_policy.clone())
    }

    pub fn with_model(
        model: Option<Arc<dyn GenerativeModel>>,
        generation: GenerationParams,
        retry_policy: RetryPolicy,
    ) -> Self {
        let use_case = RecommendMessagesUseCase::new(model)
            .with_params(generation)
            .with_retry_policy(retry_policy);
        Self {
            recommend_use_case: Arc::new(use_case),
        }
    }

    pub fn recommend_use_case(&self) -> Arc<RecommendMessagesUseCase> {
        Arc::clone(&self.recommend_use_case)
    }

    pub fn is_model_configured(&self) -> bool {
        self.recommend_use_case.is_model_configured()
    }
}
