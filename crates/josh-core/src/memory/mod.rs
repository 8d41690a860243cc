//! Bounded conversation memory.
//!
//! Keeps the prompt small by remembering only the most recent turns.
//! The window is a fixed-size FIFO: once full, the oldest turn is evicted
//! on every append. No summarization, no weighting.

use std::collections::VecDeque;

use crate::session::{ConversationMessage, MessageRole};

/// Default number of turns forwarded to the completion call.
pub const DEFAULT_WINDOW_TURNS: usize = 10;

/// A fixed-size sliding window over conversation turns.
///
/// Invariant: the window never holds more than `window_turns` turns,
/// however many have been recorded in total.
#[derive(Debug, Clone)]
pub struct BufferWindowMemory {
    window_turns: usize,
    turns: VecDeque<ConversationMessage>,
}

impl BufferWindowMemory {
    /// Creates a window of [`DEFAULT_WINDOW_TURNS`] turns.
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW_TURNS)
    }

    /// Creates a window holding at most `window_turns` turns.
    pub fn with_window(window_turns: usize) -> Self {
        Self {
            window_turns,
            turns: VecDeque::with_capacity(window_turns),
        }
    }

    /// Records a turn, evicting the oldest turns once the window is full.
    pub fn record(&mut self, role: MessageRole, content: impl Into<String>) {
        self.turns.push_back(ConversationMessage::now(role, content));
        while self.turns.len() > self.window_turns {
            self.turns.pop_front();
        }
    }

    /// Returns the remembered turns, oldest first.
    pub fn window(&self) -> impl Iterator<Item = &ConversationMessage> {
        self.turns.iter()
    }

    /// Maximum number of turns the window retains.
    pub fn window_turns(&self) -> usize {
        self.window_turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for BufferWindowMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_never_exceeds_limit() {
        let mut memory = BufferWindowMemory::new();

        for i in 0..25 {
            memory.record(MessageRole::Human, format!("msg-{i}"));
            assert!(memory.len() <= DEFAULT_WINDOW_TURNS);
        }

        assert_eq!(memory.len(), DEFAULT_WINDOW_TURNS);
    }

    #[test]
    fn test_eviction_drops_oldest_first() {
        let mut memory = BufferWindowMemory::with_window(3);

        memory.record(MessageRole::Human, "first");
        memory.record(MessageRole::Assistant, "second");
        memory.record(MessageRole::Human, "third");
        memory.record(MessageRole::Assistant, "fourth");

        let contents: Vec<&str> = memory.window().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["second", "third", "fourth"]);
    }

    #[test]
    fn test_twelve_turns_keep_most_recent_ten() {
        let mut memory = BufferWindowMemory::new();

        for i in 1..=12 {
            memory.record(MessageRole::Human, format!("msg-{i}"));
        }

        let contents: Vec<&str> = memory.window().map(|m| m.content.as_str()).collect();
        assert_eq!(contents.len(), 10);
        assert_eq!(contents.first(), Some(&"msg-3"));
        assert_eq!(contents.last(), Some(&"msg-12"));
    }

    #[test]
    fn test_short_history_is_untouched() {
        let mut memory = BufferWindowMemory::new();

        memory.record(MessageRole::Human, "Hi");
        memory.record(MessageRole::Assistant, "Peace be with you");

        assert_eq!(memory.len(), 2);
    }
}
