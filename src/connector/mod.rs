//! # Connector Layer
//!
//! External integrations around the application layer:
//! - Generative model adapters (Gemini over HTTP, scripted in-process model)
//! - HTTP API exposing the recommendation endpoint
//! - Client for calling that endpoint from a chat front end
//! - Startup database connectivity probe

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
