use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use keyring::Entry;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Fixed key the token is stored under.
pub const TOKEN_KEY: &str = "userToken";

/// Keychain service name
const SERVICE_NAME: &str = "townsquare";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt session file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored token cannot be sent in a request header")]
    InvalidToken,
}

/// Persistence for the single session token.
///
/// `load` reports an absent token as `Ok(None)`; `Err` always means the
/// storage medium itself failed.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn save(&self, token: &str) -> Result<(), StoreError>;
    async fn load(&self) -> Result<Option<String>, StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

// ============================================================================
// OS keychain
// ============================================================================

/// Token kept in the OS keychain under service `townsquare`, account `userToken`.
pub struct KeyringStore {
    entry: Entry,
}

impl KeyringStore {
    pub fn new() -> Result<Self, StoreError> {
        let entry = Entry::new(SERVICE_NAME, TOKEN_KEY)?;
        Ok(Self { entry })
    }
}

#[async_trait]
impl TokenStore for KeyringStore {
    async fn save(&self, token: &str) -> Result<(), StoreError> {
        self.entry.set_password(token)?;
        debug!("Token stored in keychain");
        Ok(())
    }

    async fn load(&self) -> Result<Option<String>, StoreError> {
        match self.entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// JSON file
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    #[serde(rename = "userToken")]
    user_token: String,
}

/// Token kept in a small JSON file: `{"userToken": "..."}`.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl TokenStore for FileStore {
    async fn save(&self, token: &str) -> Result<(), StoreError> {
        let contents = serde_json::to_vec_pretty(&SessionFile {
            user_token: token.to_string(),
        })
        .map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_private(&path, &contents))
            .await
            .map_err(|e| self.io_error(std::io::Error::other(e)))??;
        debug!(path = %self.path.display(), "Token stored on disk");
        Ok(())
    }

    async fn load(&self) -> Result<Option<String>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let file: SessionFile =
            serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(file.user_token))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Swap `contents` in at `path` with a single rename, so a concurrent reader
/// sees either the previous file or the new one. The file is created
/// owner-only (0600 on Unix).
fn replace_private(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let io_error = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_error)?;

    let mut file = tempfile::Builder::new()
        .prefix(".session")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(io_error)?;
    file.write_all(contents).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}

// ============================================================================
// In-memory
// ============================================================================

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn save(&self, token: &str) -> Result<(), StoreError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    async fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot().clone())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_last_write_wins() {
        let store = MemoryStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        store.save("first").await.unwrap();
        store.save("second").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("second"));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
        // clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.load().await.unwrap(), None);

        store.save("abc123").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("abc123"));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[TOKEN_KEY], "abc123");

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_file_store_unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should be
        let store = FileStore::new(dir.path());
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_file_store_reader_never_sees_partial_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(FileStore::new(dir.path().join("session.json")));
        store.save("token-0").await.unwrap();

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                for i in 1..=200 {
                    store.save(&format!("token-{}", i)).await?;
                }
                Ok::<_, StoreError>(())
            })
        };
        let reader = {
            let store = store.clone();
            tokio::spawn(async move {
                for _ in 0..400 {
                    let token = store.load().await?;
                    assert!(token.is_some_and(|t| t.starts_with("token-")));
                }
                Ok::<_, StoreError>(())
            })
        };

        writer.await.unwrap().unwrap();
        reader.await.unwrap().unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("token-200"));

        // no temp files left behind
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        store.save("secret").await.unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_keyring_store_missing_entry_is_absent() {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        let store = KeyringStore::new().unwrap();

        assert_eq!(store.load().await.unwrap(), None);
        store.clear().await.unwrap();

        store.save("kc-token").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("kc-token"));
        store.save("kc-newer").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("kc-newer"));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
        store.clear().await.unwrap();
    }
}
