//! Domain services: pure transformations over domain models.

mod prompt_builder;

pub use prompt_builder::*;
