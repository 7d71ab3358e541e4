//! # Application Layer
//!
//! Use cases orchestrating domain logic and the generative model interface.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
