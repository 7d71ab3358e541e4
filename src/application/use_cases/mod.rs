mod recommend_messages;
mod retry_policy;

pub use recommend_messages::*;
pub use retry_policy::*;
