pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    GenerationParams, GenerativeModel, RecommendMessagesUseCase, RetryPolicy,
};

pub use connector::{
    build_router, serve, ApiError, ClientConfig, ClientError, Container, ContainerConfig,
    DatabaseProbeConfig, GeminiClient, ScriptedModel, SuggestionClient, HEALTH_PATH,
    RECOMMENDATION_PATH,
};

pub use domain::{
    ChatContext, ChatMessage, ContextDraft, Conversation, DomainError, ErrorKind,
    MissingContextPolicy, PromptBuilder, Role, SuggestionList, UserProfile, ERROR_MARKER,
    MAX_SUGGESTIONS,
};
