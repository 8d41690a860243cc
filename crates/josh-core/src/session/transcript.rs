//! Full conversation transcript.
//!
//! The transcript is the ordered, append-only sequence of turns shown to the
//! user. It is retained in full for display, unlike the bounded window that
//! feeds the completion call, and it lives only as long as the process.

use super::message::{ConversationMessage, MessageRole};

/// The ordered sequence of turns in one session, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ConversationMessage>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn and returns a reference to it.
    ///
    /// Pure append: turns are never reordered or removed.
    pub fn append(
        &mut self,
        role: MessageRole,
        content: impl Into<String>,
    ) -> &ConversationMessage {
        self.messages.push(ConversationMessage::now(role, content));
        // Safe to unwrap because we just pushed an element
        self.messages.last().unwrap()
    }

    /// Returns all turns in insertion order.
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// Returns a restartable iterator over the turns, for display.
    pub fn iter(&self) -> std::slice::Iter<'_, ConversationMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
