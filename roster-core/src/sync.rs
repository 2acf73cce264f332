//! List synchronization engine for Roster.
//!
//! [`ListSync`] owns every piece of listing state: the displayed collection,
//! the modification overlay, the page tracker, the load state machine and
//! the edit draft. It performs no I/O. The caller asks it what to fetch,
//! performs the request, and reports the outcome back:
//!
//! ```text
//! mount()/load_more() -> LoadOutcome::Fetch(page) -> api.list_users(page)
//!                                                  -> page_loaded / page_failed
//! reserve_write() -> api.update_user(..) -> edit_succeeded / edit_failed
//! api.delete_user(id) -> delete_succeeded / delete_failed
//! ```
//!
//! Every failure leaves the collection, overlay and cursor untouched.

use std::collections::HashSet;
use roster_types::{PageCursor, RosterError, User, UserId, UserPage};

use crate::collection::{ModificationOverlay, UserCollection, WriteTicket};
use crate::cursor::PageTracker;
use crate::filter::SearchQuery;
use crate::state::{Action, Event, ListEvent, ListState};

/// Collection size below which a delete on the first page pulls in the next
/// page. Matches the directory API's page size.
pub const DEFAULT_BACKFILL_THRESHOLD: usize = 6;

/// What a load request resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fetch this page now.
    Fetch(PageCursor),
    /// A fetch is already in flight; nothing to do.
    InFlight,
    /// Every page has loaded.
    Exhausted,
}

impl LoadOutcome {
    /// The page to fetch, if any.
    pub fn page(&self) -> Option<PageCursor> {
        match self {
            Self::Fetch(page) => Some(*page),
            _ => None,
        }
    }
}

/// Outcome of a merged page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    /// The merged page.
    pub page: PageCursor,
    /// Records appended by this page.
    pub added: usize,
    /// Whether further pages can be loaded.
    pub has_more: bool,
}

/// The list synchronization engine.
#[derive(Debug, Clone)]
pub struct ListSync {
    state: ListState,
    pages: PageTracker,
    users: UserCollection,
    overlay: ModificationOverlay,
    removed: HashSet<UserId>,
    draft: Option<User>,
    error: Option<String>,
    events: Vec<ListEvent>,
    backfill_threshold: usize,
}

impl Default for ListSync {
    fn default() -> Self {
        Self::new()
    }
}

impl ListSync {
    /// Create an empty engine with the default backfill threshold.
    pub fn new() -> Self {
        Self::with_backfill_threshold(DEFAULT_BACKFILL_THRESHOLD)
    }

    /// Create an empty engine. A threshold of 0 disables backfill.
    pub fn with_backfill_threshold(backfill_threshold: usize) -> Self {
        Self {
            state: ListState::new(),
            pages: PageTracker::new(),
            users: UserCollection::new(),
            overlay: ModificationOverlay::new(),
            removed: HashSet::new(),
            draft: None,
            error: None,
            events: Vec::new(),
            backfill_threshold,
        }
    }

    // ===========================================
    // Loading
    // ===========================================

    /// Initial load: request the first page unless something already loaded
    /// or is loading.
    pub fn mount(&mut self) -> LoadOutcome {
        if self.pages.has_loaded() {
            return LoadOutcome::Exhausted;
        }
        self.request(PageCursor::FIRST)
    }

    /// Incremental load: request the page after the current cursor.
    ///
    /// Suppressed while a fetch is in flight, and a no-op once every page
    /// has loaded. After a failure this re-requests the page that failed.
    pub fn load_more(&mut self) -> LoadOutcome {
        if self.state.is_loading() {
            self.events.push(ListEvent::LoadSuppressed {
                page: self.pages.current(),
            });
            return LoadOutcome::InFlight;
        }
        match self.pages.next_page() {
            Some(page) => self.request(page),
            None => LoadOutcome::Exhausted,
        }
    }

    fn request(&mut self, page: PageCursor) -> LoadOutcome {
        let actions = self.transition(Event::LoadRequested { page });
        let fetch = actions.iter().find_map(|action| match action {
            Action::FetchPage { page } => Some(*page),
            _ => None,
        });
        match fetch {
            Some(page) => LoadOutcome::Fetch(page),
            None => LoadOutcome::InFlight,
        }
    }

    /// Report a successful fetch of `requested`.
    ///
    /// Returns `None` if no fetch for that page was in flight (stale result).
    pub fn page_loaded(&mut self, requested: PageCursor, page: UserPage) -> Option<MergeReport> {
        let actions = self.transition(Event::PageLoaded { page: requested });
        if !actions
            .iter()
            .any(|action| matches!(action, Action::MergePage { .. }))
        {
            return None;
        }

        let added = self
            .users
            .merge_page(page.data, &self.overlay, &self.removed);
        self.pages.record_loaded(requested, page.total_pages);
        self.error = None;

        Some(MergeReport {
            page: requested,
            added,
            has_more: self.pages.has_more(),
        })
    }

    /// Report a failed fetch of `requested`. Collection and cursor stay as
    /// they are.
    pub fn page_failed(&mut self, requested: PageCursor, message: impl Into<String>) {
        let message = message.into();
        let actions = self.transition(Event::PageFailed {
            page: requested,
            error: message.clone(),
        });
        if !actions.is_empty() {
            self.error = Some(message);
        }
    }

    fn transition(&mut self, event: Event) -> Vec<Action> {
        let state = std::mem::take(&mut self.state);
        let (next, actions) = state.on_event(event);
        self.state = next;
        for action in &actions {
            if let Action::EmitEvent(event) = action {
                self.events.push(event.clone());
            }
        }
        actions
    }

    // ===========================================
    // Edit
    // ===========================================

    /// Enter edit mode for a displayed record.
    pub fn begin_edit(&mut self, id: UserId) -> Result<&User, RosterError> {
        let user = self
            .users
            .get(id)
            .cloned()
            .ok_or(RosterError::UnknownUser(id))?;
        Ok(self.draft.insert(user))
    }

    /// The record being edited.
    pub fn draft(&self) -> Option<&User> {
        self.draft.as_ref()
    }

    /// Change the draft's first name. Returns `false` outside edit mode.
    pub fn set_first_name(&mut self, value: impl Into<String>) -> bool {
        self.edit_draft(|user| user.first_name = value.into())
    }

    /// Change the draft's last name. Returns `false` outside edit mode.
    pub fn set_last_name(&mut self, value: impl Into<String>) -> bool {
        self.edit_draft(|user| user.last_name = value.into())
    }

    /// Change the draft's email. Returns `false` outside edit mode.
    pub fn set_email(&mut self, value: impl Into<String>) -> bool {
        self.edit_draft(|user| user.email = value.into())
    }

    fn edit_draft(&mut self, f: impl FnOnce(&mut User)) -> bool {
        match self.draft.as_mut() {
            Some(user) => {
                f(user);
                true
            }
            None => false,
        }
    }

    /// Leave edit mode without saving.
    pub fn cancel_edit(&mut self) -> Option<User> {
        self.draft.take()
    }

    /// Check a candidate and reserve its overlay write.
    ///
    /// Only records currently displayed can be edited.
    pub fn reserve_write(&mut self, candidate: &User) -> Result<WriteTicket, RosterError> {
        if !self.users.contains(candidate.id) {
            return Err(RosterError::UnknownUser(candidate.id));
        }
        Ok(self.overlay.reserve())
    }

    /// Fold a successful update into the overlay and the collection.
    ///
    /// Returns `false` when the write was superseded by a newer ticket, the
    /// record was deleted meanwhile, or the listing was reset since the ticket
    /// was reserved; nothing changes in that case.
    pub fn edit_succeeded(&mut self, ticket: WriteTicket, user: User) -> bool {
        // Written before a reset: belongs to a listing that no longer exists
        if !self.overlay.is_current(ticket) {
            return false;
        }

        let id = user.id;
        if self.draft.as_ref().is_some_and(|draft| draft.id == id) {
            self.draft = None;
        }
        self.error = None;

        if self.removed.contains(&id) || !self.users.contains(id) {
            return false;
        }
        if !self.overlay.record(ticket, user.clone()) {
            return false;
        }
        self.users.replace(user)
    }

    /// Record a failed update. Edit mode stays active.
    pub fn edit_failed(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    // ===========================================
    // Delete
    // ===========================================

    /// Remove a deleted record from the overlay and the collection.
    ///
    /// The id is kept out of later merges even if it was never displayed,
    /// since the server confirmed the delete. Returns a backfill load only
    /// when a displayed record left, the first page has shrunk below the
    /// threshold and more pages exist.
    pub fn delete_succeeded(&mut self, id: UserId) -> Option<LoadOutcome> {
        self.overlay.remove(id);
        let displayed = self.users.remove(id).is_some();
        self.removed.insert(id);
        self.error = None;
        if self.draft.as_ref().is_some_and(|draft| draft.id == id) {
            self.draft = None;
        }

        if displayed && self.needs_backfill() {
            let outcome = self.load_more();
            if matches!(outcome, LoadOutcome::Fetch(_)) {
                return Some(outcome);
            }
        }
        None
    }

    fn needs_backfill(&self) -> bool {
        self.backfill_threshold > 0
            && self.users.len() < self.backfill_threshold
            && self.pages.has_loaded()
            && self.pages.current().is_first()
            && self.pages.has_more()
            && !self.state.is_loading()
    }

    /// Record a failed delete. Nothing else changes.
    pub fn delete_failed(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    // ===========================================
    // Queries
    // ===========================================

    /// Displayed users in order.
    pub fn users(&self) -> &[User] {
        self.users.as_slice()
    }

    /// The displayed record for `id`.
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(id)
    }

    /// Displayed users matching `query`.
    pub fn filtered(&self, query: &SearchQuery) -> Vec<&User> {
        query.apply(self.users.as_slice())
    }

    /// The modification overlay.
    pub fn overlay(&self) -> &ModificationOverlay {
        &self.overlay
    }

    /// Current load state.
    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// The message of the last failure, if not cleared since.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Dismiss the error message.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Current page cursor.
    pub fn current_page(&self) -> PageCursor {
        self.pages.current()
    }

    /// Total pages reported by the server.
    pub fn total_pages(&self) -> Option<u32> {
        self.pages.total_pages()
    }

    /// Whether further pages can be loaded.
    pub fn has_more(&self) -> bool {
        self.pages.has_more()
    }

    /// Take the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<ListEvent> {
        std::mem::take(&mut self.events)
    }

    /// Discard all listing state (logout / navigation away).
    ///
    /// Write tickets reserved before the reset are void afterwards.
    pub fn reset(&mut self) {
        let mut overlay = std::mem::take(&mut self.overlay);
        overlay.reset();
        *self = Self::with_backfill_threshold(self.backfill_threshold);
        self.overlay = overlay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64) -> User {
        User {
            id: UserId::new(id),
            first_name: format!("First{}", id),
            last_name: format!("Last{}", id),
            email: format!("user{}@server.test", id),
            avatar: format!("https://img.test/{}.jpg", id),
        }
    }

    fn page_of(page: u32, ids: &[u64], total_pages: u32) -> UserPage {
        UserPage {
            page: PageCursor::new(page),
            per_page: ids.len() as u32,
            total: 0,
            total_pages,
            data: ids.iter().map(|&id| user(id)).collect(),
        }
    }

    /// Mount and load page 1 with the given ids.
    fn loaded(ids: &[u64], total_pages: u32) -> ListSync {
        let mut sync = ListSync::new();
        let page = sync.mount().page().unwrap();
        sync.page_loaded(page, page_of(1, ids, total_pages)).unwrap();
        sync
    }

    fn ids(sync: &ListSync) -> Vec<u64> {
        sync.users().iter().map(|u| u.id.value()).collect()
    }

    // ===========================================
    // Loading Tests
    // ===========================================

    #[test]
    fn first_page_scenario() {
        let mut sync = ListSync::new();
        assert_eq!(sync.mount(), LoadOutcome::Fetch(PageCursor::FIRST));
        assert!(sync.is_loading());

        let report = sync
            .page_loaded(PageCursor::FIRST, page_of(1, &[1, 2], 3))
            .unwrap();

        assert_eq!(ids(&sync), vec![1, 2]);
        assert!(report.has_more);
        assert!(sync.has_more());
        assert_eq!(sync.total_pages(), Some(3));
        assert!(!sync.is_loading());
    }

    #[test]
    fn mount_twice_does_not_refetch() {
        let mut sync = loaded(&[1, 2], 2);
        assert_eq!(sync.mount(), LoadOutcome::Exhausted);
    }

    #[test]
    fn load_more_while_loading_is_suppressed() {
        let mut sync = loaded(&[1, 2], 3);
        assert_eq!(sync.load_more(), LoadOutcome::Fetch(PageCursor::new(2)));
        assert_eq!(sync.load_more(), LoadOutcome::InFlight);
        assert!(sync
            .drain_events()
            .iter()
            .any(|e| matches!(e, ListEvent::LoadSuppressed { .. })));
    }

    #[test]
    fn load_more_stops_when_exhausted() {
        let mut sync = loaded(&[1, 2], 2);
        let page = sync.load_more().page().unwrap();
        sync.page_loaded(page, page_of(2, &[3, 4], 2)).unwrap();

        assert!(!sync.has_more());
        assert_eq!(sync.load_more(), LoadOutcome::Exhausted);
        assert_eq!(ids(&sync), vec![1, 2, 3, 4]);
    }

    #[test]
    fn refetching_a_page_does_not_duplicate() {
        let mut sync = loaded(&[1, 2], 3);
        let before = sync.users().to_vec();

        // Force a second fetch of the same page through the state machine.
        sync.request(PageCursor::FIRST);
        let report = sync
            .page_loaded(PageCursor::FIRST, page_of(1, &[1, 2], 3))
            .unwrap();

        assert_eq!(report.added, 0);
        assert_eq!(sync.users(), before.as_slice());
    }

    #[test]
    fn cursor_is_monotonic_across_loads() {
        let mut sync = loaded(&[1], 4);
        let mut last = sync.current_page();
        while let LoadOutcome::Fetch(page) = sync.load_more() {
            sync.page_loaded(page, page_of(page.value(), &[page.value() as u64 * 10], 4))
                .unwrap();
            assert!(sync.current_page() >= last);
            assert_eq!(
                sync.has_more(),
                sync.current_page().value() < sync.total_pages().unwrap()
            );
            last = sync.current_page();
        }
        assert_eq!(last, PageCursor::new(4));
    }

    #[test]
    fn fetch_failure_leaves_collection_and_has_more() {
        let mut sync = loaded(&[1, 2], 3);
        let page = sync.load_more().page().unwrap();
        let before = sync.users().to_vec();

        sync.page_failed(page, "An error occurred while fetching users");

        assert_eq!(sync.users(), before.as_slice());
        assert!(sync.has_more());
        assert_eq!(sync.error(), Some("An error occurred while fetching users"));
        assert!(sync.state().error().is_some());
        assert_eq!(sync.current_page(), PageCursor::FIRST);
    }

    #[test]
    fn load_more_after_failure_retries_the_failed_page() {
        let mut sync = loaded(&[1, 2], 3);
        let page = sync.load_more().page().unwrap();
        sync.page_failed(page, "down");

        assert_eq!(sync.load_more(), LoadOutcome::Fetch(PageCursor::new(2)));
        sync.page_loaded(PageCursor::new(2), page_of(2, &[3], 3))
            .unwrap();
        assert!(sync.error().is_none());
        assert_eq!(ids(&sync), vec![1, 2, 3]);
    }

    #[test]
    fn stale_page_result_is_ignored() {
        let mut sync = loaded(&[1, 2], 3);
        assert!(sync
            .page_loaded(PageCursor::new(3), page_of(3, &[9], 3))
            .is_none());
        assert_eq!(ids(&sync), vec![1, 2]);
    }

    // ===========================================
    // Edit Tests
    // ===========================================

    #[test]
    fn edit_scenario_survives_refetch() {
        let mut sync = loaded(&[1, 2], 3);

        let mut candidate = sync.user(UserId::new(2)).unwrap().clone();
        candidate.email = "a@b.com".into();
        let ticket = sync.reserve_write(&candidate).unwrap();
        assert!(sync.edit_succeeded(ticket, candidate));
        assert_eq!(sync.user(UserId::new(2)).unwrap().email, "a@b.com");

        // Next page carries a stale server copy of id 2.
        let page = sync.load_more().page().unwrap();
        sync.page_loaded(page, page_of(2, &[2, 3], 3)).unwrap();

        assert_eq!(sync.user(UserId::new(2)).unwrap().email, "a@b.com");
        assert_eq!(ids(&sync), vec![1, 2, 3]);
    }

    #[test]
    fn overlay_applies_to_records_merged_later() {
        // Edit lands while a fetch is in flight; the page result must not
        // overwrite it.
        let mut sync = loaded(&[1, 2], 3);
        let page = sync.load_more().page().unwrap();

        let mut candidate = user(2);
        candidate.first_name = "Edited".into();
        let ticket = sync.reserve_write(&candidate).unwrap();
        sync.edit_succeeded(ticket, candidate);

        sync.page_loaded(page, page_of(2, &[2, 3], 3)).unwrap();
        assert_eq!(sync.user(UserId::new(2)).unwrap().first_name, "Edited");
    }

    #[test]
    fn edit_keeps_position() {
        let mut sync = loaded(&[1, 2, 3], 1);
        let mut candidate = user(2);
        candidate.last_name = "Changed".into();
        let ticket = sync.reserve_write(&candidate).unwrap();
        sync.edit_succeeded(ticket, candidate);

        assert_eq!(ids(&sync), vec![1, 2, 3]);
        assert_eq!(sync.users()[1].last_name, "Changed");
    }

    #[test]
    fn edit_mode_draft_flow() {
        let mut sync = loaded(&[1, 2], 1);

        assert!(!sync.set_email("x@y.z"));
        sync.begin_edit(UserId::new(1)).unwrap();
        assert!(sync.set_first_name("Ann"));
        assert!(sync.set_last_name("Lee"));
        assert!(sync.set_email("ann@lee.test"));

        let draft = sync.draft().unwrap().clone();
        assert_eq!(draft.full_name(), "Ann Lee");
        assert_eq!(draft.avatar, user(1).avatar);
        // Displayed record is untouched until the save resolves.
        assert_eq!(sync.user(UserId::new(1)).unwrap().first_name, "First1");

        let ticket = sync.reserve_write(&draft).unwrap();
        sync.edit_succeeded(ticket, draft);
        assert!(sync.draft().is_none());
        assert_eq!(sync.user(UserId::new(1)).unwrap().email, "ann@lee.test");
    }

    #[test]
    fn edit_failure_keeps_edit_mode_and_state() {
        let mut sync = loaded(&[1, 2], 1);
        sync.begin_edit(UserId::new(2)).unwrap();
        sync.set_email("new@mail.test");
        let before = sync.users().to_vec();

        sync.edit_failed("An error occurred while updating user");

        assert_eq!(sync.users(), before.as_slice());
        assert!(sync.overlay().is_empty());
        assert_eq!(sync.draft().unwrap().email, "new@mail.test");
        assert_eq!(sync.error(), Some("An error occurred while updating user"));
    }

    #[test]
    fn cancel_edit_discards_draft() {
        let mut sync = loaded(&[1], 1);
        sync.begin_edit(UserId::new(1)).unwrap();
        sync.set_first_name("Nope");
        assert_eq!(sync.cancel_edit().unwrap().first_name, "Nope");
        assert!(sync.draft().is_none());
        assert_eq!(sync.user(UserId::new(1)).unwrap().first_name, "First1");
    }

    #[test]
    fn editing_unknown_user_is_rejected() {
        let mut sync = loaded(&[1], 1);
        assert_eq!(
            sync.begin_edit(UserId::new(5)).unwrap_err(),
            RosterError::UnknownUser(UserId::new(5))
        );
        assert!(sync.reserve_write(&user(5)).is_err());
    }

    #[test]
    fn superseded_edit_is_discarded() {
        let mut sync = loaded(&[1], 1);
        let mut older = user(1);
        older.email = "older@mail.test".into();
        let mut newer = user(1);
        newer.email = "newer@mail.test".into();

        let t1 = sync.reserve_write(&older).unwrap();
        let t2 = sync.reserve_write(&newer).unwrap();

        assert!(sync.edit_succeeded(t2, newer));
        assert!(!sync.edit_succeeded(t1, older));
        assert_eq!(sync.user(UserId::new(1)).unwrap().email, "newer@mail.test");
    }

    // ===========================================
    // Delete Tests
    // ===========================================

    #[test]
    fn delete_removes_exactly_one_record() {
        let mut sync = ListSync::with_backfill_threshold(0);
        let page = sync.mount().page().unwrap();
        sync.page_loaded(page, page_of(1, &[1, 2, 3], 2)).unwrap();
        let before = sync.users().to_vec();

        assert!(sync.delete_succeeded(UserId::new(2)).is_none());

        assert_eq!(ids(&sync), vec![1, 3]);
        assert_eq!(sync.user(UserId::new(1)), before.first());
        assert_eq!(sync.user(UserId::new(3)), before.last());
    }

    #[test]
    fn delete_clears_overlay_entry() {
        let mut sync = loaded(&[1, 2], 1);
        let ticket = sync.reserve_write(&user(2)).unwrap();
        sync.edit_succeeded(ticket, user(2));
        assert!(sync.overlay().contains(UserId::new(2)));

        sync.delete_succeeded(UserId::new(2));
        assert!(!sync.overlay().contains(UserId::new(2)));
    }

    #[test]
    fn deleted_record_is_not_resurrected_by_later_merge() {
        let mut sync = ListSync::with_backfill_threshold(0);
        let page = sync.mount().page().unwrap();
        sync.page_loaded(page, page_of(1, &[1, 2], 3)).unwrap();
        sync.delete_succeeded(UserId::new(1));

        let page = sync.load_more().page().unwrap();
        sync.page_loaded(page, page_of(2, &[1, 3], 3)).unwrap();

        assert_eq!(ids(&sync), vec![2, 3]);
    }

    #[test]
    fn delete_failure_scenario() {
        let mut sync = loaded(&[1, 2], 1);
        let before = sync.users().to_vec();

        sync.delete_failed("An error occurred while deleting user");

        assert_eq!(sync.users(), before.as_slice());
        assert!(sync.error().is_some());
    }

    #[test]
    fn edit_resolving_after_delete_is_dropped() {
        let mut sync = loaded(&[1, 2], 1);
        let ticket = sync.reserve_write(&user(2)).unwrap();
        sync.delete_succeeded(UserId::new(2));

        assert!(!sync.edit_succeeded(ticket, user(2)));
        assert!(sync.user(UserId::new(2)).is_none());
        assert!(sync.overlay().is_empty());
    }

    #[test]
    fn delete_on_first_page_backfills_next_page() {
        let mut sync = loaded(&[1, 2, 3, 4, 5, 6], 2);

        let outcome = sync.delete_succeeded(UserId::new(3));

        assert_eq!(outcome, Some(LoadOutcome::Fetch(PageCursor::new(2))));
        assert!(sync.is_loading());
    }

    #[test]
    fn backfill_skipped_past_first_page_or_when_disabled() {
        let mut sync = loaded(&[1, 2], 3);
        let page = sync.load_more().page().unwrap();
        sync.page_loaded(page, page_of(2, &[3, 4], 3)).unwrap();
        assert!(sync.delete_succeeded(UserId::new(1)).is_none());

        let mut sync = ListSync::with_backfill_threshold(0);
        let page = sync.mount().page().unwrap();
        sync.page_loaded(page, page_of(1, &[1, 2], 3)).unwrap();
        assert!(sync.delete_succeeded(UserId::new(1)).is_none());
    }

    #[test]
    fn backfill_skipped_without_more_pages() {
        let mut sync = loaded(&[1, 2], 1);
        assert!(sync.delete_succeeded(UserId::new(1)).is_none());
    }

    #[test]
    fn deleting_undisplayed_id_does_not_backfill() {
        let mut sync = loaded(&[1, 2], 2);

        assert!(sync.delete_succeeded(UserId::new(9)).is_none());
        assert!(!sync.is_loading());
        assert_eq!(ids(&sync), vec![1, 2]);

        // Still never merged in later
        let page = sync.load_more().page().unwrap();
        sync.page_loaded(page, page_of(2, &[9, 10], 2)).unwrap();
        assert_eq!(ids(&sync), vec![1, 2, 10]);
    }

    // ===========================================
    // Search / Reset Tests
    // ===========================================

    #[test]
    fn search_without_match_leaves_state_untouched() {
        let sync = loaded(&[1, 2], 3);
        let before = sync.users().to_vec();

        assert!(sync.filtered(&SearchQuery::new("smith")).is_empty());
        assert_eq!(sync.users(), before.as_slice());
        assert!(sync.has_more());
    }

    #[test]
    fn search_matches_overlay_values() {
        let mut sync = loaded(&[1, 2], 1);
        let mut candidate = user(2);
        candidate.last_name = "Smith".into();
        let ticket = sync.reserve_write(&candidate).unwrap();
        sync.edit_succeeded(ticket, candidate);

        let hits = sync.filtered(&SearchQuery::new("smith"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, UserId::new(2));
    }

    #[test]
    fn reset_discards_everything_but_threshold() {
        let mut sync = ListSync::with_backfill_threshold(3);
        let page = sync.mount().page().unwrap();
        sync.page_loaded(page, page_of(1, &[1, 2], 2)).unwrap();
        sync.reset();

        assert!(sync.users().is_empty());
        assert_eq!(sync.mount(), LoadOutcome::Fetch(PageCursor::FIRST));
        assert_eq!(sync.backfill_threshold, 3);
    }

    #[test]
    fn edit_reserved_before_reset_is_dropped() {
        let mut sync = loaded(&[1], 1);
        let mut candidate = user(1);
        candidate.email = "stale@server.test".into();
        let ticket = sync.reserve_write(&candidate).unwrap();

        sync.reset();
        assert!(!sync.edit_succeeded(ticket, candidate));
        assert!(sync.overlay().is_empty());
        assert!(sync.users().is_empty());

        // The next listing shows the server copy
        let page = sync.mount().page().unwrap();
        sync.page_loaded(page, page_of(1, &[1], 1)).unwrap();
        assert_eq!(sync.user(UserId::new(1)).unwrap().email, "user1@server.test");

        // Tickets reserved after the reset still apply
        let mut candidate = user(1);
        candidate.email = "fresh@server.test".into();
        let ticket = sync.reserve_write(&candidate).unwrap();
        assert!(sync.edit_succeeded(ticket, candidate));
        assert_eq!(sync.user(UserId::new(1)).unwrap().email, "fresh@server.test");
    }
}
