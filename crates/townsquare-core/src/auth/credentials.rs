use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::api::ApiError;

use super::store::{MemoryStore, TokenStore};

/// Whether a token is currently stored. Never carries the token itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

struct Inner {
    store: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
}

/// Handle to the stored session token, shared by every service.
///
/// Each successful `save` or `clear` is published to subscribers, so a
/// view layer can switch between its signed-in and signed-out screens
/// without polling storage.
#[derive(Clone)]
pub struct Credentials {
    inner: Arc<Inner>,
}

impl Credentials {
    /// Starts out `Anonymous`; call [`Credentials::refresh_state`] to pick up
    /// a token persisted by an earlier run.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Anonymous);
        Self {
            inner: Arc::new(Inner { store, state }),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub async fn save(&self, token: &str) -> Result<(), ApiError> {
        self.inner.store.save(token).await?;
        info!("Session token saved");
        self.publish(SessionState::Authenticated);
        Ok(())
    }

    pub async fn load(&self) -> Result<Option<String>, ApiError> {
        Ok(self.inner.store.load().await?)
    }

    pub async fn clear(&self) -> Result<(), ApiError> {
        self.inner.store.clear().await?;
        info!("Session token cleared");
        self.publish(SessionState::Anonymous);
        Ok(())
    }

    /// The stored token, or `MissingCredential` when there is none.
    pub async fn require(&self) -> Result<String, ApiError> {
        match self.load().await? {
            Some(token) if !token.is_empty() => Ok(token),
            _ => {
                debug!("Authenticated call attempted without a stored token");
                Err(ApiError::MissingCredential)
            }
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    /// Re-read storage and publish what was found.
    pub async fn refresh_state(&self) -> Result<SessionState, ApiError> {
        let state = match self.load().await? {
            Some(token) if !token.is_empty() => SessionState::Authenticated,
            _ => SessionState::Anonymous,
        };
        self.publish(state);
        Ok(state)
    }

    fn publish(&self, next: SessionState) {
        self.inner.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
