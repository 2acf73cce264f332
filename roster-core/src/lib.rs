//! # roster-core
//!
//! Pure logic for Roster (no I/O, instant tests).
//!
//! This crate implements the listing state machine, the page merge and the
//! session model without any network or disk I/O.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (HTTP, token file) is performed by `roster-client`, which
//! reports each outcome back to these types.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod cursor;
pub mod filter;
pub mod session;
pub mod state;
pub mod sync;

pub use collection::{ModificationOverlay, OverlayEntry, UserCollection, WriteTicket};
pub use cursor::PageTracker;
pub use filter::SearchQuery;
pub use session::{Credentials, Route, SessionState, SessionToken};
pub use state::{Action, Event, ListEvent, ListState};
pub use sync::{ListSync, LoadOutcome, MergeReport, DEFAULT_BACKFILL_THRESHOLD};
