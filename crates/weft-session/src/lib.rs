pub mod config;
pub mod conversation;
pub mod error;
pub mod lifecycle;
pub mod merge;
pub mod reducer;
pub mod window;

pub use config::{ConfigError, HistoryConfig};
pub use conversation::{Conversation, ConversationError, ConversationHandle};
pub use error::HistoryError;
pub use lifecycle::*;
pub use merge::{merge_delta, merge_part};
pub use reducer::{apply_chunk, apply_chunk_with};
pub use window::select_window;
