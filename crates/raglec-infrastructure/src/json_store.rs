//! JSON file-backed ChatStore implementation.

use async_trait::async_trait;
use raglec_core::error::Result;
use raglec_core::session::Session;
use raglec_core::store::{ChatStore, Theme};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores the chat client's durable state as flat files in one directory.
///
/// Every file name carries the store's namespace prefix so multiple logical
/// stores can share a directory without colliding:
///
/// ```text
/// base_dir/
/// ├── raglec-sessions.json
/// ├── raglec-active-session.txt
/// └── raglec-theme.txt
/// ```
///
/// The session collection is one JSON snapshot; the active pointer and the
/// theme flag are plain text. A corrupt or unparsable snapshot fails soft:
/// it is logged and read as an empty collection, and the next save
/// overwrites it.
pub struct JsonFileStore {
    base_dir: PathBuf,
    namespace: String,
}

impl JsonFileStore {
    /// Creates a store rooted at `base_dir` with the default `raglec`
    /// namespace. The directory is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_namespace(base_dir, "raglec")
    }

    /// Creates a store with an explicit namespace prefix.
    pub fn with_namespace(base_dir: impl AsRef<Path>, namespace: impl Into<String>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            namespace: namespace.into(),
        })
    }

    /// Creates a store at the default location (~/.raglec).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or the
    /// directory cannot be created.
    pub fn default_location() -> Result<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| raglec_core::RaglecError::io("Failed to get home directory"))?;
        Self::new(home_dir.join(".raglec"))
    }

    fn key_path(&self, key: &str, extension: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}-{}.{}", self.namespace, key, extension))
    }

    fn read_if_present(path: &Path) -> Result<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }
}

#[async_trait]
impl ChatStore for JsonFileStore {
    async fn load_sessions(&self) -> Result<Vec<Session>> {
        let path = self.key_path("sessions", "json");
        let Some(json) = Self::read_if_present(&path)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&json) {
            Ok(sessions) => Ok(sessions),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "stored session collection is unreadable, resetting to empty"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn save_sessions(&self, sessions: &[Session]) -> Result<()> {
        let json = serde_json::to_string_pretty(sessions)?;
        fs::write(self.key_path("sessions", "json"), json)?;
        Ok(())
    }

    async fn load_active_session_id(&self) -> Result<Option<String>> {
        let id = Self::read_if_present(&self.key_path("active-session", "txt"))?;
        Ok(id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
    }

    async fn save_active_session_id(&self, session_id: &str) -> Result<()> {
        fs::write(self.key_path("active-session", "txt"), session_id)?;
        Ok(())
    }

    async fn clear_active_session_id(&self) -> Result<()> {
        let path = self.key_path("active-session", "txt");
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    async fn load_theme(&self) -> Result<Option<Theme>> {
        let Some(value) = Self::read_if_present(&self.key_path("theme", "txt"))? else {
            return Ok(None);
        };
        let theme = Theme::parse(&value);
        if theme.is_none() {
            tracing::warn!(value = value.trim(), "unknown stored theme, ignoring");
        }
        Ok(theme)
    }

    async fn save_theme(&self, theme: Theme) -> Result<()> {
        fs::write(self.key_path("theme", "txt"), theme.as_str())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raglec_core::session::Message;
    use tempfile::TempDir;

    fn sample_session() -> Session {
        let mut session = Session::new();
        session.messages.push(Message::user("Hello"));
        session
            .messages
            .push(Message::assistant("Hi there!", Vec::new(), Some("q-1".to_string())));
        session
    }

    #[tokio::test]
    async fn test_sessions_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path()).unwrap();

        let session = sample_session();
        store.save_sessions(std::slice::from_ref(&session)).await.unwrap();

        let loaded = store.load_sessions().await.unwrap();
        assert_eq!(loaded, vec![session]);
    }

    #[tokio::test]
    async fn test_missing_files_read_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path()).unwrap();

        assert!(store.load_sessions().await.unwrap().is_empty());
        assert_eq!(store.load_active_session_id().await.unwrap(), None);
        assert_eq!(store.load_theme().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_sessions_reset_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path()).unwrap();

        fs::write(
            temp_dir.path().join("raglec-sessions.json"),
            "{not valid json",
        )
        .unwrap();

        assert!(store.load_sessions().await.unwrap().is_empty());

        // The store stays writable after recovery.
        let session = sample_session();
        store.save_sessions(std::slice::from_ref(&session)).await.unwrap();
        assert_eq!(store.load_sessions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_active_session_id_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path()).unwrap();

        store.save_active_session_id("session-7").await.unwrap();
        assert_eq!(
            store.load_active_session_id().await.unwrap(),
            Some("session-7".to_string())
        );

        store.clear_active_session_id().await.unwrap();
        assert_eq!(store.load_active_session_id().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_theme_round_trip_and_unknown_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path()).unwrap();

        store.save_theme(Theme::Dark).await.unwrap();
        assert_eq!(store.load_theme().await.unwrap(), Some(Theme::Dark));

        fs::write(temp_dir.path().join("raglec-theme.txt"), "solarized").unwrap();
        assert_eq!(store.load_theme().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_namespaces_do_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let first = JsonFileStore::with_namespace(temp_dir.path(), "one").unwrap();
        let second = JsonFileStore::with_namespace(temp_dir.path(), "two").unwrap();

        first.save_active_session_id("a").await.unwrap();
        second.save_active_session_id("b").await.unwrap();

        assert_eq!(
            first.load_active_session_id().await.unwrap(),
            Some("a".to_string())
        );
        assert_eq!(
            second.load_active_session_id().await.unwrap(),
            Some("b".to_string())
        );
    }
}
