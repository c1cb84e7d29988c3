//! Conversation accumulator.
//!
//! In-memory mirror of the active session's message log. The exchange
//! controller appends into it as exchanges complete and replaces it
//! wholesale when the active session changes.

use crate::session::Message;

/// Ordered message log for the active session.
///
/// Append-only, with full replacement on session switch. The accumulator is
/// a view of the active session's messages; after an exchange commits it is
/// synchronized back into the repository entry before persisting.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to the log.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replaces the whole log, used when switching sessions.
    pub fn replace_all(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    /// Empties the log.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// The full message log in chronological order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The last `n` messages in order.
    ///
    /// Bounds the conversation context sent to the backend so outbound
    /// request size stays capped.
    pub fn recent_window(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
