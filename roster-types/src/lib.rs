//! # roster-types
//!
//! Wire format types for the Roster user directory client.
//!
//! This crate provides the foundational types used across all Roster crates:
//! - [`UserId`], [`PageCursor`] - Identity and ordering types
//! - [`User`] - The user record as served by the directory API
//! - [`LoginRequest`], [`UserPage`], ... - Request and response bodies
//! - [`RosterError`] - Error taxonomy surfaced to the user

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod messages;
mod user;

pub use error::RosterError;
pub use ids::{PageCursor, UserId};
pub use messages::{ErrorBody, LoginRequest, LoginResponse, UpdateUserResponse, UserPage};
pub use user::User;
