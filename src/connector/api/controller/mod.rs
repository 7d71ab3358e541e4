pub mod health_controller;
pub mod recommendation_controller;

pub use health_controller::{health, HealthResponse};
pub use recommendation_controller::{recommend, RequestEnvelope, SuggestionResponse};
