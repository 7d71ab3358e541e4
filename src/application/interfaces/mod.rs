mod generative_model;

pub use generative_model::*;
