//! Conversation message types.
//!
//! This module contains types for representing messages in a conversation:
//! the user/assistant tagged union and the retrieved source fragments that
//! accompany assistant answers.

use serde::{Deserialize, Serialize};

/// A retrieved document fragment returned by the backend to justify an
/// answer.
///
/// Sources are supplied by the backend verbatim and never mutated.
/// `chunk_index` is 0-based on the wire; views display it 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Name of the document the fragment was retrieved from.
    pub file_name: String,
    /// Position of the fragment within the document (0-based).
    pub chunk_index: u32,
    /// Total number of fragments the document was split into.
    pub total_chunks: u32,
    /// The fragment text itself.
    pub content: String,
    /// Cosine similarity against the query embedding, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
}

/// A single message in a session's conversation log.
///
/// An `Assistant` message is only constructed once its full text has been
/// received; reveal pacing is a view concern and never stores a prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// Message typed by the user.
    User {
        /// The submitted text, already whitespace-trimmed.
        text: String,
    },
    /// Answer produced by the assistant.
    Assistant {
        /// The complete answer text.
        text: String,
        /// Retrieval sources justifying the answer, possibly empty.
        #[serde(default)]
        sources: Vec<Source>,
        /// Backend-issued identifier correlating later feedback votes.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        answer_id: Option<String>,
    },
}

impl Message {
    /// Creates a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::User { text: text.into() }
    }

    /// Creates an assistant message from a completed exchange.
    pub fn assistant(
        text: impl Into<String>,
        sources: Vec<Source>,
        answer_id: Option<String>,
    ) -> Self {
        Self::Assistant {
            text: text.into(),
            sources,
            answer_id,
        }
    }

    /// The message text, regardless of role.
    pub fn text(&self) -> &str {
        match self {
            Self::User { text } => text,
            Self::Assistant { text, .. } => text,
        }
    }

    /// Role name as the backend expects it in conversation history.
    pub fn role(&self) -> &'static str {
        match self {
            Self::User { .. } => "user",
            Self::Assistant { .. } => "assistant",
        }
    }

    /// Whether this message was typed by the user.
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }
}
