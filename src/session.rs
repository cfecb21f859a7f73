//! Authentication session: bearer token plus the current user.
//!
//! A [`Session`] is created once at startup, shared through `Arc`, and handed to
//! the client and the auth service. The token is persisted through a
//! [`TokenStore`] so a restart can reuse it.

use crate::error::{SessionError, SessionResult};
use crate::models::User;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// What a [`TokenStore`] persists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredSession {
    pub token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Persistence for the session token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> SessionResult<Option<StoredSession>>;
    fn save(&self, session: &StoredSession) -> SessionResult<()>;
    fn clear(&self) -> SessionResult<()>;
}

/// Stores the session as JSON in a file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> SessionResult<Option<StoredSession>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let stored: StoredSession =
            serde_json::from_str(&raw).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        if stored.token.trim().is_empty() {
            return Err(SessionError::Corrupt("empty token".to_string()));
        }
        Ok(Some(stored))
    }

    fn save(&self, session: &StoredSession) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json =
            serde_json::to_string(session).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps the session in memory only; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<StoredSession>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a session, as if saved by a previous run.
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> SessionResult<Option<StoredSession>> {
        let slot = self.slot.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(slot.clone())
    }

    fn save(&self, session: &StoredSession) -> SessionResult<()> {
        let mut slot = self.slot.lock().map_err(|_| SessionError::Poisoned)?;
        *slot = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        let mut slot = self.slot.lock().map_err(|_| SessionError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
}

/// The current authentication state.
pub struct Session {
    store: Box<dyn TokenStore>,
    state: RwLock<SessionState>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("Session")
            .field("has_token", &state.token.is_some())
            .field("user", &state.user.as_ref().map(|u| u.email.as_str()))
            .finish()
    }
}

impl Session {
    /// Empty session backed by `store`.
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        Self {
            store,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Empty session that is never persisted.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryTokenStore::new()))
    }

    /// Session initialized from whatever `store` holds.
    ///
    /// A corrupt stored session is discarded and the store cleared; the token
    /// itself is not validated here (see `AuthService::check_auth`).
    pub fn restore(store: Box<dyn TokenStore>) -> Self {
        let loaded = match store.load() {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!("Discarding stored session: {}", e);
                if let Err(e) = store.clear() {
                    tracing::warn!("Failed to clear session store: {}", e);
                }
                None
            }
        };

        let state = match loaded {
            Some(stored) => {
                tracing::debug!("Restored stored session token");
                SessionState {
                    token: Some(stored.token),
                    user: stored.user,
                }
            }
            None => SessionState::default(),
        };

        Self {
            store,
            state: RwLock::new(state),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn has_token(&self) -> bool {
        self.read().token.is_some()
    }

    /// Both a token and the user it belongs to are known.
    pub fn is_authenticated(&self) -> bool {
        let state = self.read();
        state.token.is_some() && state.user.is_some()
    }

    /// Replace the token, dropping any previously known user, and persist it.
    pub fn set_token(&self, token: impl Into<String>) -> SessionResult<()> {
        let token = token.into();
        {
            let mut state = self.write();
            state.token = Some(token.clone());
            state.user = None;
        }
        self.store.save(&StoredSession { token, user: None })
    }

    /// Attach the current user. Ignored when there is no token.
    pub fn set_user(&self, user: User) -> SessionResult<()> {
        let token = {
            let mut state = self.write();
            let Some(token) = state.token.clone() else {
                return Ok(());
            };
            state.user = Some(user.clone());
            token
        };
        self.store.save(&StoredSession {
            token,
            user: Some(user),
        })
    }

    /// Forget the token and user, in memory and in storage.
    pub fn clear(&self) -> SessionResult<()> {
        *self.write() = SessionState::default();
        self.store.clear()
    }
}
