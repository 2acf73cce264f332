//! Error types for Roster.

use thiserror::Error;

use crate::UserId;

/// Errors surfaced to the user by Roster operations.
///
/// Every variant carries a human-readable message; none is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// Login was rejected (bad credentials or unreachable server).
    #[error("{0}")]
    Authentication(String),

    /// A listing page could not be fetched.
    #[error("{0}")]
    Fetch(String),

    /// A user update was rejected.
    #[error("{0}")]
    Update(String),

    /// A user delete was rejected.
    #[error("{0}")]
    Delete(String),

    /// Input failed local validation before reaching the server.
    #[error("{0}")]
    InvalidInput(String),

    /// The user is not part of the displayed collection.
    #[error("user {0} is not in the list")]
    UnknownUser(UserId),

    /// No session token is present.
    #[error("not logged in")]
    NotAuthenticated,
}

impl RosterError {
    /// The message shown next to the affected region.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
