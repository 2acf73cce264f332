//! Durable session for Roster.
//!
//! [`Session`] pairs the pure [`SessionState`] with a [`TokenStore`] that
//! keeps the token across process runs. Two stores ship:
//! - [`FileTokenStore`]: `session.json` under a data directory, owner-only
//!   permissions on Unix
//! - [`MemoryTokenStore`]: process-local, for tests and embedding
//!
//! # Example
//!
//! ```ignore
//! let store = FileTokenStore::new(&data_dir);
//! let mut session = Session::load(store).await?;
//! if !session.is_authenticated() {
//!     session.login(&api, Credentials::new(email, password)).await?;
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use roster_core::{Credentials, Route, SessionState, SessionToken};
use roster_types::RosterError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{Operation, UserApi};

/// File name of the persisted session.
pub const SESSION_FILE: &str = "session.json";

/// Token storage errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the store failed.
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored session could not be parsed.
    #[error("invalid session file: {0}")]
    Parse(String),
}

/// Login errors.
#[derive(Debug, Error)]
pub enum LoginError {
    /// Rejected locally or by the server.
    #[error(transparent)]
    Rejected(#[from] RosterError),

    /// The token was issued but could not be stored.
    #[error(transparent)]
    Storage(#[from] SessionError),
}

/// Durable slot for the session token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any.
    async fn load(&self) -> Result<Option<SessionToken>, SessionError>;

    /// Replace the stored token.
    async fn save(&self, token: &SessionToken) -> Result<(), SessionError>;

    /// Remove the stored token. Removing an absent token succeeds.
    async fn clear(&self) -> Result<(), SessionError>;
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: SessionToken,
}

/// Token store backed by `session.json` in a data directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the session in `data_dir/session.json`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }

    /// Path of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<SessionToken>, SessionError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredSession =
            serde_json::from_str(&contents).map_err(|e| SessionError::Parse(e.to_string()))?;
        Ok(Some(stored.token).filter(|token| !token.is_blank()))
    }

    async fn save(&self, token: &SessionToken) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let stored = StoredSession {
            token: token.clone(),
        };
        let contents = serde_json::to_string_pretty(&stored)
            .map_err(|e| SessionError::Parse(e.to_string()))?;
        tokio::fs::write(&self.path, contents).await?;
        set_file_permissions_0600(&self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Set file permissions to 0600 (owner read/write only) on Unix.
/// No-op on non-Unix platforms.
async fn set_file_permissions_0600(path: &Path) -> Result<(), SessionError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Process-local token store.
///
/// Clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<SessionToken>>>,
}

impl MemoryTokenStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `token`.
    pub fn with_token(token: SessionToken) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token))),
        }
    }

    /// Whether a token is stored.
    pub fn is_set(&self) -> bool {
        self.slot.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<SessionToken>, SessionError> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| SessionError::Parse(e.to_string()))?;
        Ok(slot.clone())
    }

    async fn save(&self, token: &SessionToken) -> Result<(), SessionError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| SessionError::Parse(e.to_string()))?;
        *slot = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| SessionError::Parse(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}

/// The authenticated session: in-memory state backed by a token store.
#[derive(Debug)]
pub struct Session<S: TokenStore> {
    store: S,
    state: SessionState,
}

impl<S: TokenStore> Session<S> {
    /// Hydrate from `store`.
    pub async fn load(store: S) -> Result<Self, SessionError> {
        let token = store.load().await?;
        let state = SessionState::hydrate(token);
        debug!(authenticated = state.is_authenticated(), "session hydrated");
        Ok(Self { store, state })
    }

    /// Whether a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// The held token.
    pub fn token(&self) -> Option<&SessionToken> {
        self.state.token()
    }

    /// The current route.
    pub fn route(&self) -> Route {
        self.state.route()
    }

    /// Navigate to `route` through the guard. Returns where the user landed.
    pub fn navigate(&mut self, route: Route) -> Route {
        let landed = self.state.navigate(route);
        if landed != route {
            debug!(requested = %route, landed = %landed, "route guard redirected");
        }
        landed
    }

    /// Require a token, as the guarded listing does.
    pub fn require_token(&self) -> Result<&SessionToken, RosterError> {
        self.state.token().ok_or(RosterError::NotAuthenticated)
    }

    /// Log in through `api`.
    ///
    /// Empty fields are rejected before any request. On success the token is
    /// persisted first, then held, and the route moves to the listing. On
    /// failure nothing changes.
    pub async fn login<A: UserApi + ?Sized>(
        &mut self,
        api: &A,
        credentials: Credentials,
    ) -> Result<&SessionToken, LoginError> {
        credentials.validate()?;

        let token = match api.login(&credentials).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "login failed");
                return Err(e.into_roster(Operation::Login).into());
            }
        };
        drop(credentials);

        self.store.save(&token).await?;
        self.state.logged_in(token);
        info!("logged in");
        self.require_token().map_err(LoginError::from)
    }

    /// Log out: clear the stored token and move to the login view.
    ///
    /// Logging out without a session still lands on the login view.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        self.store.clear().await?;
        let was_authenticated = self.state.is_authenticated();
        self.state.logged_out();
        if was_authenticated {
            info!("logged out");
        }
        Ok(())
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
