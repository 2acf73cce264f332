//! Request and response bodies of the directory API.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{PageCursor, User};

/// Body of `POST /login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful response of `POST /login`.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    /// Opaque session token.
    pub token: String,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &format!("[{} chars REDACTED]", self.token.len()))
            .finish()
    }
}

/// One page of `GET /users?page=N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPage {
    /// The page this response answers.
    #[serde(default)]
    pub page: PageCursor,
    /// Records per page.
    #[serde(default)]
    pub per_page: u32,
    /// Total records across all pages.
    #[serde(default)]
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Records on this page.
    pub data: Vec<User>,
}

/// Response of `PUT /users/{id}`.
///
/// The API echoes the submitted fields; only the timestamp is of interest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateUserResponse {
    /// Server-side update timestamp, if reported.
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<String>,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}
