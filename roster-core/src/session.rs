//! Session and route model for Roster.
//!
//! This module provides:
//! - [`SessionToken`]: the opaque token returned by login (redacted, zeroized)
//! - [`Credentials`]: login input with local validation
//! - [`Route`]: the two views and the guard that protects the listing
//! - [`SessionState`]: token + current route, with pure login/logout transitions
//!
//! Persisting the token is roster-client's job; this module only decides what
//! the state is after each transition.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};
use roster_types::RosterError;

/// Opaque session token.
///
/// Zeroed when dropped, never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the Authorization header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the token is blank.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken([{} chars REDACTED])", self.0.len())
    }
}

/// Login input.
///
/// The password buffer is zeroed when the credentials are dropped.
#[derive(Clone)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: Zeroizing<String>,
}

impl Credentials {
    /// Build credentials from user input.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Reject empty fields before anything is sent.
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(RosterError::InvalidInput(
                "Email and password are required".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// The views a user can be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    /// The login form.
    #[default]
    Login,
    /// The protected user listing.
    Users,
}

impl Route {
    /// Resolve a path. The root and unknown paths land on the login view.
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/users" | "users" => Self::Users,
            _ => Self::Login,
        }
    }

    /// The canonical path of this route.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Users => "/users",
        }
    }

    /// Whether the route requires a session token.
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Users)
    }

    /// Where a visitor actually lands when asking for this route.
    pub fn guard(self, authenticated: bool) -> Self {
        if self.is_protected() && !authenticated {
            Self::Login
        } else {
            self
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Token and current route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    token: Option<SessionToken>,
    route: Route,
}

impl SessionState {
    /// An unauthenticated session on the login view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a token found in durable storage. Blank tokens count as
    /// absent.
    pub fn hydrate(token: Option<SessionToken>) -> Self {
        let token = token.filter(|t| !t.is_blank());
        let route = if token.is_some() {
            Route::Users
        } else {
            Route::Login
        };
        Self { token, route }
    }

    /// Store the token and move to the listing.
    pub fn logged_in(&mut self, token: SessionToken) {
        self.token = Some(token);
        self.route = Route::Users;
    }

    /// Drop the token and move to the login view.
    pub fn logged_out(&mut self) {
        self.token = None;
        self.route = Route::Login;
    }

    /// Navigate, applying the guard.
    pub fn navigate(&mut self, route: Route) -> Route {
        self.route = route.guard(self.is_authenticated());
        self.route
    }

    /// Whether a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The held token.
    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    /// The current route.
    pub fn route(&self) -> Route {
        self.route
    }
}
