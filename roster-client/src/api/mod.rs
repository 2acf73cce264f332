//! Directory API abstraction for Roster.
//!
//! This module provides a pluggable API layer over the four calls the client
//! makes (reqwest over HTTP, mock for testing).
//!
//! # Design
//!
//! The API trait is async and stateless from the caller's point of view:
//! - `login()` exchanges credentials for a session token
//! - `list_users()` fetches one page of the listing
//! - `update_user()` submits a full user record
//! - `delete_user()` removes a record by id
//!
//! Failures come back as [`ApiError`]. Each operation maps it into the
//! user-facing [`RosterError`] with [`ApiError::into_roster`], which prefers
//! the server's `{ "error": ... }` message and otherwise falls back to a fixed
//! message per operation.
//!
//! # Example
//!
//! ```ignore
//! let api = MockApi::new();
//! api.add_page(page_one);
//! let page = api.list_users(PageCursor::FIRST).await?;
//! ```

mod http;
mod mock;

pub use http::{HttpApi, HttpConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use mock::{MockApi, MockRequest, DEFAULT_MOCK_TOKEN};

use async_trait::async_trait;
use roster_core::{Credentials, SessionToken};
use roster_types::{PageCursor, RosterError, UpdateUserResponse, User, UserId, UserPage};
use thiserror::Error;

/// API errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The `error` field of the response body, if it had one.
        message: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// The message the server supplied, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// Map into the user-facing error for `operation`.
    pub fn into_roster(self, operation: Operation) -> RosterError {
        let message = self
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| operation.fallback_message().to_string());
        operation.error(message)
    }
}

/// The API operations, used to pick the error variant and fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `POST /login`
    Login,
    /// `GET /users`
    FetchUsers,
    /// `PUT /users/{id}`
    UpdateUser,
    /// `DELETE /users/{id}`
    DeleteUser,
}

impl Operation {
    /// Message shown when the server did not supply one.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::Login => "An error occurred during login",
            Self::FetchUsers => "An error occurred while fetching users",
            Self::UpdateUser => "An error occurred while updating user",
            Self::DeleteUser => "An error occurred while deleting user",
        }
    }

    fn error(&self, message: String) -> RosterError {
        match self {
            Self::Login => RosterError::Authentication(message),
            Self::FetchUsers => RosterError::Fetch(message),
            Self::UpdateUser => RosterError::Update(message),
            Self::DeleteUser => RosterError::Delete(message),
        }
    }
}

/// The directory API.
///
/// Implementations carry their own authentication (base URL, API key, bearer
/// token); callers only pass the operation's input.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// Exchange credentials for a session token.
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, ApiError>;

    /// Fetch one page of users.
    async fn list_users(&self, page: PageCursor) -> Result<UserPage, ApiError>;

    /// Submit the full record for `user.id`.
    async fn update_user(&self, user: &User) -> Result<UpdateUserResponse, ApiError>;

    /// Delete the record for `id`.
    async fn delete_user(&self, id: UserId) -> Result<(), ApiError>;
}
