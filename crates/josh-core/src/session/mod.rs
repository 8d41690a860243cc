//! Conversation session domain module.
//!
//! This module contains the domain types for one chat session:
//!
//! - `message`: Conversation turn types (`MessageRole`, `ConversationMessage`)
//! - `transcript`: The full, append-only display sequence (`Transcript`)

mod message;
mod transcript;

// Re-export public API
pub use message::{ConversationMessage, MessageRole};
pub use transcript::Transcript;
