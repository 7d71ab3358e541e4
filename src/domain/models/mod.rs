mod chat_context;
mod conversation;
mod suggestion_list;

pub use chat_context::*;
pub use conversation::*;
pub use suggestion_list::*;
