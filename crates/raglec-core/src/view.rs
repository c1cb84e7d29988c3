//! View-model boundary.
//!
//! The core never reaches into view internals. Rendering is a pure mapping
//! from domain messages to view-model values, and updates cross the
//! boundary through the [`ViewSink`] trait so the view layer stays
//! swappable.

use crate::config::ClientConfig;
use crate::session::{Message, Source};
use std::time::Duration;

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Warning,
    Info,
}

/// A non-blocking, self-dismissing notice.
///
/// Notices surface recoverable failures (transport errors, missing answer
/// ids) without touching conversation state. `ttl` is the auto-dismiss
/// duration; the view owns the timer.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    pub ttl: Duration,
}

impl Notice {
    pub fn error(text: impl Into<String>, ttl: Duration) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Error,
            ttl,
        }
    }

    pub fn warning(text: impl Into<String>, ttl: Duration) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Warning,
            ttl,
        }
    }
}

/// Renderable form of a retrieved source fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceView {
    pub file_name: String,
    /// 1-based fragment number for display.
    pub fragment: u32,
    pub total_fragments: u32,
    pub content: String,
    pub similarity: Option<f32>,
    /// Whether the fragment starts expanded.
    pub expanded: bool,
}

/// Renderable form of a conversation message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageView {
    User {
        text: String,
    },
    Assistant {
        text: String,
        sources: Vec<SourceView>,
        answer_id: Option<String>,
    },
}

/// Maps a domain message to its view model. Pure; holds no view state.
pub fn render_message(message: &Message, config: &ClientConfig) -> MessageView {
    match message {
        Message::User { text } => MessageView::User { text: text.clone() },
        Message::Assistant {
            text,
            sources,
            answer_id,
        } => MessageView::Assistant {
            text: text.clone(),
            sources: sources
                .iter()
                .map(|s| render_source(s, config.sources_expanded))
                .collect(),
            answer_id: answer_id.clone(),
        },
    }
}

fn render_source(source: &Source, expanded: bool) -> SourceView {
    SourceView {
        file_name: source.file_name.clone(),
        fragment: source.chunk_index + 1,
        total_fragments: source.total_chunks,
        content: source.content.clone(),
        similarity: source.similarity,
        expanded,
    }
}

/// Receiver for view updates pushed by the core.
///
/// Implementations must not block; they are called from the exchange
/// controller's task.
pub trait ViewSink: Send + Sync {
    /// A finished message entered the active session's log.
    fn message_appended(&self, session_id: &str, view: MessageView);

    /// The reveal advanced; `revealed` is the currently visible prefix.
    fn reveal_progress(&self, session_id: &str, revealed: &str);

    /// A transient notice should be shown.
    fn notice(&self, notice: Notice);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> Source {
        Source {
            file_name: "doc1.txt".to_string(),
            chunk_index: 0,
            total_chunks: 3,
            content: "fragment text".to_string(),
            similarity: Some(0.9),
        }
    }

    #[test]
    fn test_render_assistant_fragment_is_one_based() {
        let message = Message::assistant("answer", vec![source()], Some("q-1".to_string()));
        let view = render_message(&message, &ClientConfig::default());

        match view {
            MessageView::Assistant { sources, .. } => {
                assert_eq!(sources[0].fragment, 1);
                assert_eq!(sources[0].total_fragments, 3);
            }
            _ => panic!("expected assistant view"),
        }
    }

    #[test]
    fn test_sources_collapsed_by_default() {
        let message = Message::assistant("answer", vec![source()], None);
        let view = render_message(&message, &ClientConfig::default());

        match view {
            MessageView::Assistant { sources, .. } => assert!(!sources[0].expanded),
            _ => panic!("expected assistant view"),
        }
    }

    #[test]
    fn test_sources_expanded_when_configured() {
        let config = ClientConfig {
            sources_expanded: true,
            ..ClientConfig::default()
        };
        let message = Message::assistant("answer", vec![source()], None);

        match render_message(&message, &config) {
            MessageView::Assistant { sources, .. } => assert!(sources[0].expanded),
            _ => panic!("expected assistant view"),
        }
    }

    #[test]
    fn test_render_user_message() {
        let view = render_message(&Message::user("hello"), &ClientConfig::default());
        assert_eq!(
            view,
            MessageView::User {
                text: "hello".to_string()
            }
        );
    }
}
