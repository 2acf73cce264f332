//! # roster-client
//!
//! Client library for the Roster user directory.
//!
//! This is the main library that front ends use to talk to the directory.
//!
//! ## Features
//!
//! - **API Abstraction**: Pluggable API layer (reqwest over HTTP, mock)
//! - **Durable Session**: Token persisted to `session.json` with owner-only
//!   permissions, hydrated on start
//! - **Pure Engine**: Uses roster-core for side-effect-free listing logic
//! - **Confirmed Writes**: Edits and deletes reach the listing only after the
//!   server accepts them
//!
//! ## Example
//!
//! ```ignore
//! use roster_client::{FileTokenStore, HttpApi, HttpConfig, Session, UserListClient};
//!
//! let mut session = Session::load(FileTokenStore::new(&data_dir)).await?;
//! let api = HttpApi::new(HttpConfig::default())?;
//! session.login(&api, Credentials::new(email, password)).await?;
//!
//! let client = UserListClient::new(api.with_token(session.token().cloned()));
//! client.mount().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod client;
pub mod session;

pub use api::{
    ApiError, HttpApi, HttpConfig, MockApi, MockRequest, Operation, UserApi, DEFAULT_BASE_URL,
    DEFAULT_MOCK_TOKEN, DEFAULT_TIMEOUT,
};
pub use client::{DraftField, UserListClient};
pub use session::{
    FileTokenStore, LoginError, MemoryTokenStore, Session, SessionError, TokenStore, SESSION_FILE,
};
