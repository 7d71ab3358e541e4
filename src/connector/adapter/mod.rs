mod connectivity_probe;
mod gemini_client;
mod scripted_model;
mod suggestion_client;

pub use connectivity_probe::*;
pub use gemini_client::*;
pub use scripted_model::*;
pub use suggestion_client::*;
