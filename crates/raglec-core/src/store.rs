//! Persistent store boundary.
//!
//! Defines the interface for durable reads and writes of the session
//! collection, the active-session pointer, and the theme preference. The
//! store is a pure serialization boundary with no business logic; the
//! session repository is its single writer.

use crate::error::Result;
use crate::session::Session;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Visual theme preference persisted alongside the session collection.
///
/// The library only stores and returns the flag; applying it is the view's
/// job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

impl Theme {
    /// Stable storage token for this theme.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parses a stored token. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// An abstract store for the chat client's durable state.
///
/// Implementations must key every entry under a stable namespace prefix so
/// multiple logical stores never collide, and must fail soft on corrupt
/// payloads: `load_sessions` returns an empty collection instead of
/// propagating a parse error.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Loads the full session collection.
    ///
    /// Corrupt or unparsable stored data resets to an empty collection;
    /// only genuine I/O failures surface as errors.
    async fn load_sessions(&self) -> Result<Vec<Session>>;

    /// Writes the full session collection. Idempotent.
    async fn save_sessions(&self, sessions: &[Session]) -> Result<()>;

    /// Gets the id of the currently active session, if one is recorded.
    async fn load_active_session_id(&self) -> Result<Option<String>>;

    /// Records the id of the currently active session.
    async fn save_active_session_id(&self, session_id: &str) -> Result<()>;

    /// Clears the active-session pointer.
    async fn clear_active_session_id(&self) -> Result<()>;

    /// Gets the persisted theme preference, if any.
    async fn load_theme(&self) -> Result<Option<Theme>>;

    /// Records the theme preference.
    async fn save_theme(&self, theme: Theme) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_tokens_round_trip() {
        assert_eq!(Theme::parse(Theme::Light.as_str()), Some(Theme::Light));
        assert_eq!(Theme::parse(Theme::Dark.as_str()), Some(Theme::Dark));
    }

    #[test]
    fn test_theme_parse_rejects_unknown() {
        assert_eq!(Theme::parse("solarized"), None);
        assert_eq!(Theme::parse(""), None);
    }

    #[test]
    fn test_theme_parse_trims() {
        assert_eq!(Theme::parse(" dark\n"), Some(Theme::Dark));
    }
}
