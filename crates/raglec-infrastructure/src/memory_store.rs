//! In-memory ChatStore implementation.

use async_trait::async_trait;
use raglec_core::error::Result;
use raglec_core::session::Session;
use raglec_core::store::{ChatStore, Theme};
use std::sync::Mutex;

/// Non-durable store keeping everything in process memory.
///
/// Useful for tests and for embedding the client where persistence is not
/// wanted. State dies with the process.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<State>,
}

#[derive(Default)]
struct State {
    sessions: Vec<Session>,
    active: Option<String>,
    theme: Option<Theme>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn load_sessions(&self) -> Result<Vec<Session>> {
        Ok(self.inner.lock().unwrap().sessions.clone())
    }

    async fn save_sessions(&self, sessions: &[Session]) -> Result<()> {
        self.inner.lock().unwrap().sessions = sessions.to_vec();
        Ok(())
    }

    async fn load_active_session_id(&self) -> Result<Option<String>> {
        Ok(self.inner.lock().unwrap().active.clone())
    }

    async fn save_active_session_id(&self, session_id: &str) -> Result<()> {
        self.inner.lock().unwrap().active = Some(session_id.to_string());
        Ok(())
    }

    async fn clear_active_session_id(&self) -> Result<()> {
        self.inner.lock().unwrap().active = None;
        Ok(())
    }

    async fn load_theme(&self) -> Result<Option<Theme>> {
        Ok(self.inner.lock().unwrap().theme)
    }

    async fn save_theme(&self, theme: Theme) -> Result<()> {
        self.inner.lock().unwrap().theme = Some(theme);
        Ok(())
    }
}
