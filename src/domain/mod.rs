//! # Domain Layer
//!
//! Chat context, suggestion lists, prompt rendering and the error taxonomy.
//! This layer is independent of HTTP and of any model vendor.

mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
