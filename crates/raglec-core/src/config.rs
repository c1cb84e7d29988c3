//! Client configuration.

use std::time::Duration;

/// Tunable policies for the chat client.
///
/// The defaults are the canonical behavior; deviating deployments adjust a
/// field here rather than patching the components that read it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Number of trailing messages sent to the backend as conversation
    /// context. Caps outbound request size.
    pub history_window: usize,
    /// Upper bound on tracked sessions before the oldest non-active ones
    /// are evicted.
    pub max_sessions: usize,
    /// Whether retrieved sources render expanded (true) or collapsed (false).
    pub sources_expanded: bool,
    /// How long transient failure notices stay visible.
    pub notice_ttl: Duration,
    /// Maximum display length of an auto-derived session title.
    pub title_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            history_window: 10,
            max_sessions: 50,
            sources_expanded: false,
            notice_ttl: Duration::from_secs(5),
            title_limit: 30,
        }
    }
}
