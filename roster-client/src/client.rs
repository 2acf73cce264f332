//! UserListClient - the listing interface for Roster.
//!
//! This module provides [`UserListClient`], which drives the pure
//! [`ListSync`] engine (from roster-core) against a [`UserApi`].
//!
//! # Architecture
//!
//! ```text
//! Application → UserListClient → UserApi → Network
//!                     ↓
//!              roster-core (pure engine)
//! ```
//!
//! The engine sits behind a `tokio::sync::Mutex`. The lock is taken to decide
//! what to do, released while the API call is in flight, and taken again to
//! apply the result, so every mutation of the collection and overlay happens
//! in one critical section and a fetch never blocks an edit or delete.
//!
//! # Example
//!
//! ```ignore
//! use roster_client::{MockApi, UserListClient};
//!
//! let client = UserListClient::new(MockApi::with_users(12, 6));
//! client.mount().await?;
//! while client.has_more().await {
//!     client.load_more().await?;
//! }
//! ```

use roster_core::{ListEvent, ListSync, LoadOutcome, MergeReport, SearchQuery};
use roster_types::{PageCursor, RosterError, User, UserId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::{Operation, UserApi};

/// A field of the edit draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    /// `first_name`
    FirstName,
    /// `last_name`
    LastName,
    /// `email`
    Email,
}

impl std::str::FromStr for DraftField {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "first_name" | "first-name" | "first" => Ok(Self::FirstName),
            "last_name" | "last-name" | "last" => Ok(Self::LastName),
            "email" => Ok(Self::Email),
            other => Err(RosterError::InvalidInput(format!(
                "unknown field '{}' (expected first_name, last_name or email)",
                other
            ))),
        }
    }
}

/// The listing client.
///
/// Owns the engine for one mounted listing; dropping the client discards the
/// collection and the overlay.
pub struct UserListClient<A: UserApi> {
    api: A,
    sync: Mutex<ListSync>,
}

impl<A: UserApi> UserListClient<A> {
    /// Create a client with the default backfill threshold.
    pub fn new(api: A) -> Self {
        Self::with_engine(api, ListSync::new())
    }

    /// Create a client with a custom backfill threshold (0 disables).
    pub fn with_backfill_threshold(api: A, threshold: usize) -> Self {
        Self::with_engine(api, ListSync::with_backfill_threshold(threshold))
    }

    fn with_engine(api: A, engine: ListSync) -> Self {
        Self {
            api,
            sync: Mutex::new(engine),
        }
    }

    // ===========================================
    // Loading
    // ===========================================

    /// Load the first page, unless something already loaded.
    pub async fn mount(&self) -> Result<Option<MergeReport>, RosterError> {
        let outcome = self.sync.lock().await.mount();
        self.fetch(outcome).await
    }

    /// Load the next page.
    ///
    /// Returns `Ok(None)` when a fetch is already in flight or every page has
    /// loaded.
    pub async fn load_more(&self) -> Result<Option<MergeReport>, RosterError> {
        let outcome = self.sync.lock().await.load_more();
        self.fetch(outcome).await
    }

    /// Load pages until none remain or `limit` pages have loaded.
    ///
    /// Returns the number of records appended.
    pub async fn load_pages(&self, limit: Option<usize>) -> Result<usize, RosterError> {
        let mut added = 0;
        let mut loaded = 0;

        if let Some(report) = self.mount().await? {
            added += report.added;
            loaded += 1;
        }
        while limit.map_or(true, |limit| loaded < limit) {
            match self.load_more().await? {
                Some(report) => {
                    added += report.added;
                    loaded += 1;
                    if !report.has_more {
                        break;
                    }
                }
                None => break,
            }
        }
        Ok(added)
    }

    async fn fetch(&self, outcome: LoadOutcome) -> Result<Option<MergeReport>, RosterError> {
        let page = match outcome {
            LoadOutcome::Fetch(page) => page,
            LoadOutcome::InFlight => {
                debug!("load suppressed, fetch in flight");
                return Ok(None);
            }
            LoadOutcome::Exhausted => return Ok(None),
        };

        debug!(page = page.value(), "fetching page");
        let result = self.api.list_users(page).await;

        let mut sync = self.sync.lock().await;
        match result {
            Ok(users) => {
                let report = sync.page_loaded(page, users);
                match report {
                    Some(report) => info!(
                        page = page.value(),
                        added = report.added,
                        has_more = report.has_more,
                        "page merged"
                    ),
                    None => debug!(page = page.value(), "stale page result ignored"),
                }
                Ok(report)
            }
            Err(e) => {
                warn!(page = page.value(), error = %e, "page fetch failed");
                let err = e.into_roster(Operation::FetchUsers);
                sync.page_failed(page, err.message());
                Err(err)
            }
        }
    }

    // ===========================================
    // Edit
    // ===========================================

    /// Enter edit mode for a displayed record. Returns the draft.
    pub async fn begin_edit(&self, id: UserId) -> Result<User, RosterError> {
        let mut sync = self.sync.lock().await;
        sync.begin_edit(id).cloned()
    }

    /// Change one field of the draft.
    pub async fn set_draft_field(
        &self,
        field: DraftField,
        value: impl Into<String>,
    ) -> Result<(), RosterError> {
        let mut sync = self.sync.lock().await;
        let changed = match field {
            DraftField::FirstName => sync.set_first_name(value),
            DraftField::LastName => sync.set_last_name(value),
            DraftField::Email => sync.set_email(value),
        };
        if changed {
            Ok(())
        } else {
            Err(no_draft())
        }
    }

    /// The record being edited.
    pub async fn draft(&self) -> Option<User> {
        self.sync.lock().await.draft().cloned()
    }

    /// Leave edit mode without saving.
    pub async fn cancel_edit(&self) -> Option<User> {
        self.sync.lock().await.cancel_edit()
    }

    /// Submit the draft. Edit mode ends on success and stays on failure.
    pub async fn save_edit(&self) -> Result<User, RosterError> {
        let draft = self.sync.lock().await.draft().cloned().ok_or_else(no_draft)?;
        self.save_user(draft).await
    }

    /// Submit `candidate` as the new version of a displayed record.
    ///
    /// The collection and overlay change only after the server accepts it.
    pub async fn save_user(&self, candidate: User) -> Result<User, RosterError> {
        let ticket = self.sync.lock().await.reserve_write(&candidate)?;

        debug!(id = %candidate.id, "updating user");
        let result = self.api.update_user(&candidate).await;

        let mut sync = self.sync.lock().await;
        match result {
            Ok(response) => {
                let applied = sync.edit_succeeded(ticket, candidate.clone());
                info!(
                    id = %candidate.id,
                    applied,
                    updated_at = response.updated_at.as_deref().unwrap_or("-"),
                    "user updated"
                );
                Ok(candidate)
            }
            Err(e) => {
                warn!(id = %candidate.id, error = %e, "update failed");
                let err = e.into_roster(Operation::UpdateUser);
                sync.edit_failed(err.message());
                Err(err)
            }
        }
    }

    // ===========================================
    // Delete
    // ===========================================

    /// Delete a record.
    ///
    /// On success the record leaves the collection and the overlay. If that
    /// shrinks the first page below the backfill threshold the next page is
    /// loaded; a failed backfill is recorded as the listing error but does
    /// not fail the delete.
    pub async fn delete(&self, id: UserId) -> Result<Option<MergeReport>, RosterError> {
        debug!(id = %id, "deleting user");
        let result = self.api.delete_user(id).await;

        let backfill = {
            let mut sync = self.sync.lock().await;
            match result {
                Ok(()) => sync.delete_succeeded(id),
                Err(e) => {
                    warn!(id = %id, error = %e, "delete failed");
                    let err = e.into_roster(Operation::DeleteUser);
                    sync.delete_failed(err.message());
                    return Err(err);
                }
            }
        };
        info!(id = %id, "user deleted");

        match backfill {
            Some(outcome) => match self.fetch(outcome).await {
                Ok(report) => Ok(report),
                Err(e) => {
                    warn!(error = %e, "backfill after delete failed");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    // ===========================================
    // Queries
    // ===========================================

    /// Snapshot of the displayed users.
    pub async fn users(&self) -> Vec<User> {
        self.sync.lock().await.users().to_vec()
    }

    /// Snapshot of the displayed users matching `query`.
    pub async fn filtered(&self, query: &SearchQuery) -> Vec<User> {
        let sync = self.sync.lock().await;
        sync.filtered(query).into_iter().cloned().collect()
    }

    /// Whether further pages can be loaded.
    pub async fn has_more(&self) -> bool {
        self.sync.lock().await.has_more()
    }

    /// Whether a fetch is in flight.
    pub async fn is_loading(&self) -> bool {
        self.sync.lock().await.is_loading()
    }

    /// The last error message, if not cleared since.
    pub async fn error(&self) -> Option<String> {
        self.sync.lock().await.error().map(str::to_string)
    }

    /// Dismiss the error message.
    pub async fn clear_error(&self) {
        self.sync.lock().await.clear_error();
    }

    /// Current page cursor.
    pub async fn current_page(&self) -> PageCursor {
        self.sync.lock().await.current_page()
    }

    /// Total pages reported by the server.
    pub async fn total_pages(&self) -> Option<u32> {
        self.sync.lock().await.total_pages()
    }

    /// Take the engine events emitted since the last call.
    pub async fn drain_events(&self) -> Vec<ListEvent> {
        self.sync.lock().await.drain_events()
    }

    /// Discard the listing (logout).
    pub async fn reset(&self) {
        self.sync.lock().await.reset();
    }

    /// Get a reference to the underlying API (for testing).
    pub fn api(&self) -> &A {
        &self.api
    }
}

fn no_draft() -> RosterError {
    RosterError::InvalidInput("no record is being edited".into())
}
