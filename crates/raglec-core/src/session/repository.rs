//! Session repository.
//!
//! Owns the durable session collection and the active-session pointer,
//! backed by an injected [`ChatStore`]. Every mutating operation writes the
//! collection through to the store before returning, so an external reader
//! always observes a consistent snapshot.

use crate::config::ClientConfig;
use crate::error::{RaglecError, Result};
use crate::session::model::{DEFAULT_TITLE, Session, derive_title};
use crate::session::Message;
use crate::store::{ChatStore, Theme};
use std::sync::Arc;

/// In-memory collection of chat sessions with write-through persistence.
///
/// Sessions are kept in insertion order, which is also the eviction order
/// for [`SessionRepository::trim_to_capacity`]. The repository has an
/// explicit lifecycle: nothing is loaded until [`SessionRepository::initialize`]
/// is called.
pub struct SessionRepository {
    store: Arc<dyn ChatStore>,
    config: ClientConfig,
    sessions: Vec<Session>,
    active_id: Option<String>,
}

impl SessionRepository {
    /// Creates a repository over the given store. No store access happens
    /// here; call [`SessionRepository::initialize`] to load.
    pub fn new(store: Arc<dyn ChatStore>, config: ClientConfig) -> Self {
        Self {
            store,
            config,
            sessions: Vec::new(),
            active_id: None,
        }
    }

    /// Loads the session collection and active pointer from the store.
    ///
    /// A recorded active id that no longer resolves to a session is
    /// discarded. Corrupt stored data has already been reset to empty by
    /// the store boundary.
    pub async fn initialize(&mut self) -> Result<()> {
        self.sessions = self.store.load_sessions().await?;

        let active_id = self.store.load_active_session_id().await?;
        self.active_id = active_id.filter(|id| self.sessions.iter().any(|s| &s.id == id));

        tracing::debug!(
            sessions = self.sessions.len(),
            active = self.active_id.as_deref().unwrap_or("none"),
            "session repository initialized"
        );
        Ok(())
    }

    /// Creates a fresh session, makes it active, and persists.
    pub async fn create_session(&mut self) -> Result<Session> {
        let session = Session::new();
        self.sessions.push(session.clone());
        self.active_id = Some(session.id.clone());
        self.trim_in_place(self.config.max_sessions);
        self.persist().await?;

        tracing::debug!(id = %session.id, "session created");
        Ok(session)
    }

    /// Switches the active pointer to an existing session.
    ///
    /// Fails with `NotFound` if the id is absent; the prior active session
    /// is left unchanged in that case.
    pub async fn select_session(&mut self, session_id: &str) -> Result<Session> {
        let session = self
            .sessions
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
            .ok_or_else(|| RaglecError::not_found("session", session_id))?;

        self.active_id = Some(session.id.clone());
        self.persist().await?;
        Ok(session)
    }

    /// Explicit user rename. Automatic titling only ever happens on the
    /// first user message; see [`SessionRepository::append_message`].
    pub async fn rename_session(&mut self, session_id: &str, new_title: String) -> Result<()> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| RaglecError::not_found("session", session_id))?;

        session.title = new_title;
        session.touch();
        self.persist().await
    }

    /// Removes a session. Removing an unknown id is a no-op. If the removed
    /// session was active, the pointer is cleared.
    pub async fn delete_session(&mut self, session_id: &str) -> Result<()> {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != session_id);
        if self.sessions.len() == before {
            return Ok(());
        }

        if self.active_id.as_deref() == Some(session_id) {
            self.active_id = None;
        }
        self.persist().await
    }

    /// Empties the active session's log and resets its title to the
    /// default, as when the user clears the conversation.
    pub async fn clear_active_messages(&mut self) -> Result<()> {
        let Some(active_id) = self.active_id.clone() else {
            return Ok(());
        };
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == active_id)
            .ok_or_else(|| RaglecError::not_found("session", active_id.as_str()))?;

        session.messages.clear();
        session.title = DEFAULT_TITLE.to_string();
        session.touch();
        self.persist().await
    }

    /// Evicts the oldest non-active sessions (insertion order) until at
    /// most `max_sessions` remain. The active session is never evicted.
    pub async fn trim_to_capacity(&mut self, max_sessions: usize) -> Result<()> {
        self.trim_in_place(max_sessions);
        self.persist().await
    }

    fn trim_in_place(&mut self, max_sessions: usize) {
        while self.sessions.len() > max_sessions {
            let Some(victim) = self
                .sessions
                .iter()
                .position(|s| Some(s.id.as_str()) != self.active_id.as_deref())
            else {
                break;
            };
            let evicted = self.sessions.remove(victim);
            tracing::debug!(id = %evicted.id, title = %evicted.title, "session evicted");
        }
    }

    /// Appends a message into the named session's log and persists.
    ///
    /// The first user message appended to a session still carrying the
    /// default title names the session; later messages never retitle it.
    pub async fn append_message(&mut self, session_id: &str, message: Message) -> Result<()> {
        let title_limit = self.config.title_limit;
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| RaglecError::not_found("session", session_id))?;

        if message.is_user() && session.has_default_title() {
            session.title = derive_title(message.text(), title_limit);
        }
        session.messages.push(message);
        session.touch();
        self.persist().await
    }

    /// Idempotent full-collection write-through, including the active
    /// pointer.
    pub async fn persist(&self) -> Result<()> {
        self.store.save_sessions(&self.sessions).await?;
        match &self.active_id {
            Some(id) => self.store.save_active_session_id(id).await,
            None => self.store.clear_active_session_id().await,
        }
    }

    /// The currently active session, if any.
    pub fn active_session(&self) -> Option<&Session> {
        let id = self.active_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Id of the currently active session.
    pub fn active_session_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Looks up a session by id.
    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    /// All tracked sessions in insertion order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Snapshot ordered most-recently-updated first, for sidebar listings.
    pub fn sessions_by_recency(&self) -> Vec<Session> {
        let mut sessions = self.sessions.clone();
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sessions
    }

    /// The persisted theme preference.
    pub async fn theme(&self) -> Result<Option<Theme>> {
        self.store.load_theme().await
    }

    /// Records the theme preference.
    pub async fn set_theme(&self, theme: Theme) -> Result<()> {
        self.store.save_theme(theme).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // Mock ChatStore for testing
    #[derive(Default)]
    struct MockStore {
        sessions: Mutex<Vec<Session>>,
        active: Mutex<Option<String>>,
        theme: Mutex<Option<Theme>>,
    }

    #[async_trait]
    impl ChatStore for MockStore {
        async fn load_sessions(&self) -> Result<Vec<Session>> {
            Ok(self.sessions.lock().unwrap().clone())
        }

        async fn save_sessions(&self, sessions: &[Session]) -> Result<()> {
            *self.sessions.lock().unwrap() = sessions.to_vec();
            Ok(())
        }

        async fn load_active_session_id(&self) -> Result<Option<String>> {
            Ok(self.active.lock().unwrap().clone())
        }

        async fn save_active_session_id(&self, session_id: &str) -> Result<()> {
            *self.active.lock().unwrap() = Some(session_id.to_string());
            Ok(())
        }

        async fn clear_active_session_id(&self) -> Result<()> {
            *self.active.lock().unwrap() = None;
            Ok(())
        }

        async fn load_theme(&self) -> Result<Option<Theme>> {
            Ok(*self.theme.lock().unwrap())
        }

        async fn save_theme(&self, theme: Theme) -> Result<()> {
            *self.theme.lock().unwrap() = Some(theme);
            Ok(())
        }
    }

    fn repository(store: Arc<MockStore>) -> SessionRepository {
        SessionRepository::new(store, ClientConfig::default())
    }

    #[tokio::test]
    async fn test_create_session_sets_active_and_persists() {
        let store = Arc::new(MockStore::default());
        let mut repo = repository(store.clone());

        let session = repo.create_session().await.unwrap();

        assert_eq!(repo.active_session_id(), Some(session.id.as_str()));
        assert_eq!(store.sessions.lock().unwrap().len(), 1);
        assert_eq!(*store.active.lock().unwrap(), Some(session.id));
    }

    #[tokio::test]
    async fn test_select_unknown_session_leaves_active_unchanged() {
        let store = Arc::new(MockStore::default());
        let mut repo = repository(store);

        let session = repo.create_session().await.unwrap();
        let err = repo.select_session("missing").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(repo.active_session_id(), Some(session.id.as_str()));
    }

    #[tokio::test]
    async fn test_select_session_switches_active() {
        let store = Arc::new(MockStore::default());
        let mut repo = repository(store.clone());

        let first = repo.create_session().await.unwrap();
        let _second = repo.create_session().await.unwrap();

        let selected = repo.select_session(&first.id).await.unwrap();
        assert_eq!(selected.id, first.id);
        assert_eq!(*store.active.lock().unwrap(), Some(first.id));
    }

    #[tokio::test]
    async fn test_auto_title_applies_only_once() {
        let store = Arc::new(MockStore::default());
        let mut repo = repository(store);

        let session = repo.create_session().await.unwrap();
        repo.append_message(&session.id, Message::user("What is RAG?"))
            .await
            .unwrap();
        assert_eq!(repo.session(&session.id).unwrap().title, "What is RAG?");

        repo.append_message(&session.id, Message::user("Another question"))
            .await
            .unwrap();
        assert_eq!(repo.session(&session.id).unwrap().title, "What is RAG?");
    }

    #[tokio::test]
    async fn test_auto_title_truncates_long_first_message() {
        let store = Arc::new(MockStore::default());
        let mut repo = repository(store);

        let session = repo.create_session().await.unwrap();
        let long = "x".repeat(45);
        repo.append_message(&session.id, Message::user(long.clone()))
            .await
            .unwrap();

        let title = &repo.session(&session.id).unwrap().title;
        assert_eq!(title.chars().count(), 30);
        assert!(title.ends_with("..."));
    }

    #[tokio::test]
    async fn test_trim_evicts_oldest_non_active() {
        let store = Arc::new(MockStore::default());
        let mut repo = repository(store);

        let oldest = repo.create_session().await.unwrap();
        let middle = repo.create_session().await.unwrap();
        let newest = repo.create_session().await.unwrap();

        repo.trim_to_capacity(2).await.unwrap();

        assert!(repo.session(&oldest.id).is_none());
        assert!(repo.session(&middle.id).is_some());
        assert_eq!(repo.active_session_id(), Some(newest.id.as_str()));
    }

    #[tokio::test]
    async fn test_trim_preserves_active_even_when_oldest() {
        let store = Arc::new(MockStore::default());
        let mut repo = repository(store);

        let oldest = repo.create_session().await.unwrap();
        let _middle = repo.create_session().await.unwrap();
        let _newest = repo.create_session().await.unwrap();
        repo.select_session(&oldest.id).await.unwrap();

        repo.trim_to_capacity(1).await.unwrap();

        assert_eq!(repo.sessions().len(), 1);
        assert_eq!(repo.sessions()[0].id, oldest.id);
    }

    #[tokio::test]
    async fn test_delete_active_session_clears_pointer() {
        let store = Arc::new(MockStore::default());
        let mut repo = repository(store.clone());

        let session = repo.create_session().await.unwrap();
        repo.delete_session(&session.id).await.unwrap();

        assert!(repo.active_session_id().is_none());
        assert_eq!(*store.active.lock().unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_unknown_session_is_noop() {
        let store = Arc::new(MockStore::default());
        let mut repo = repository(store);

        repo.create_session().await.unwrap();
        repo.delete_session("missing").await.unwrap();
        assert_eq!(repo.sessions().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_active_messages_resets_title() {
        let store = Arc::new(MockStore::default());
        let mut repo = repository(store);

        let session = repo.create_session().await.unwrap();
        repo.append_message(&session.id, Message::user("Name me"))
            .await
            .unwrap();

        repo.clear_active_messages().await.unwrap();

        let cleared = repo.session(&session.id).unwrap();
        assert!(cleared.messages.is_empty());
        assert_eq!(cleared.title, DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn test_initialize_restores_collection_and_pointer() {
        let store = Arc::new(MockStore::default());
        {
            let mut repo = repository(store.clone());
            let session = repo.create_session().await.unwrap();
            repo.append_message(&session.id, Message::user("Persisted"))
                .await
                .unwrap();
        }

        let mut restored = repository(store);
        restored.initialize().await.unwrap();

        assert_eq!(restored.sessions().len(), 1);
        let active = restored.active_session().unwrap();
        assert_eq!(active.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_initialize_discards_dangling_pointer() {
        let store = Arc::new(MockStore::default());
        *store.active.lock().unwrap() = Some("gone".to_string());

        let mut repo = repository(store);
        repo.initialize().await.unwrap();

        assert!(repo.active_session_id().is_none());
    }

    #[tokio::test]
    async fn test_theme_round_trip() {
        let store = Arc::new(MockStore::default());
        let repo = repository(store);

        assert_eq!(repo.theme().await.unwrap(), None);
        repo.set_theme(Theme::Dark).await.unwrap();
        assert_eq!(repo.theme().await.unwrap(), Some(Theme::Dark));
    }
}
