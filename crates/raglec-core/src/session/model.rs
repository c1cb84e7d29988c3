//! Session domain model.
//!
//! This module contains the core Session entity that represents one
//! persisted conversation thread in the application's domain layer.

use super::message::Message;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to a session before its first user message names it.
pub const DEFAULT_TITLE: &str = "New conversation";

/// Represents one conversation thread.
///
/// A session contains:
/// - An opaque unique identifier, generated at creation
/// - A short human-readable title, derived from the first user message
/// - The chronological message log
/// - Timestamps for creation and last update (RFC 3339)
///
/// The message log is append-only except for full replacement on load.
/// This is the "pure" domain model that business logic operates on,
/// independent of any specific storage format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Chronological message log
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Timestamp when the session was created (RFC 3339)
    pub created_at: String,
    /// Timestamp when the session was last updated (RFC 3339)
    pub updated_at: String,
}

impl Session {
    /// Creates an empty session with a fresh id and the default title.
    pub fn new() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Whether this session still carries the default title.
    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_TITLE
    }

    /// Bumps the update timestamp to now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives a session title from the first user message.
///
/// Titles longer than `limit` display characters are truncated to
/// `limit - 3` characters plus an ellipsis. Operates on characters, never
/// bytes, so multibyte text cannot be split mid-character.
pub fn derive_title(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let cut: String = text.chars().take(limit.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = Session::new();
        assert_eq!(session.title, DEFAULT_TITLE);
        assert!(session.messages.is_empty());
        assert!(session.has_default_title());
        assert!(!session.id.is_empty());
        assert_eq!(session.created_at, session.updated_at);
    }

    #[test]
    fn test_unique_ids() {
        assert_ne!(Session::new().id, Session::new().id);
    }

    #[test]
    fn test_derive_title_short_text_unchanged() {
        assert_eq!(derive_title("What is RAG?", 30), "What is RAG?");
    }

    #[test]
    fn test_derive_title_truncates_long_text() {
        let text = "a".repeat(40);
        let title = derive_title(&text, 30);
        assert_eq!(title, format!("{}...", "a".repeat(27)));
        assert_eq!(title.chars().count(), 30);
    }

    #[test]
    fn test_derive_title_counts_chars_not_bytes() {
        let text = "é".repeat(31);
        let title = derive_title(&text, 30);
        assert_eq!(title, format!("{}...", "é".repeat(27)));
    }

    #[test]
    fn test_derive_title_exact_limit_not_truncated() {
        let text = "b".repeat(30);
        assert_eq!(derive_title(&text, 30), text);
    }
}
