//! Page cursor tracking for Roster.
//!
//! This module tracks which listing pages have been loaded and how many the
//! server reports in total:
//! - The cursor only moves forward, and only past a page that loaded
//! - `has_more` is derived, never stored
//! - A failed page stays the next page to request
//!
//! Before the first successful fetch the total is unknown and the first page
//! is always loadable.

use roster_types::PageCursor;

/// Tracks the loaded page cursor and the server's total page count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTracker {
    /// Highest page that merged successfully.
    loaded: Option<PageCursor>,
    /// Total pages as last reported by the server.
    total_pages: Option<u32>,
}

impl PageTracker {
    /// Create a tracker with nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current page cursor: the highest loaded page, or the first page
    /// before anything loaded.
    pub fn current(&self) -> PageCursor {
        self.loaded.unwrap_or(PageCursor::FIRST)
    }

    /// Whether any page has loaded yet.
    pub fn has_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Total pages reported by the server, if known.
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Whether further pages can be requested.
    pub fn has_more(&self) -> bool {
        match (self.loaded, self.total_pages) {
            (None, _) => true,
            (Some(current), Some(total)) => current.value() < total,
            (Some(_), None) => false,
        }
    }

    /// The page an incremental load should request next, if any.
    pub fn next_page(&self) -> Option<PageCursor> {
        if !self.has_more() {
            return None;
        }
        Some(match self.loaded {
            Some(current) => current.next(),
            None => PageCursor::FIRST,
        })
    }

    /// Record that `page` loaded and the server reported `total_pages`.
    ///
    /// The cursor never decreases: re-loading an earlier page leaves it where
    /// it is. The stored total is floored at the current cursor so a shrinking
    /// report cannot make the cursor exceed the total.
    pub fn record_loaded(&mut self, page: PageCursor, total_pages: u32) {
        let current = match self.loaded {
            Some(existing) if existing >= page => existing,
            _ => page,
        };
        self.loaded = Some(current);
        self.total_pages = Some(total_pages.max(current.value()));
    }

    /// Forget everything (used on logout).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_starts_on_first_page_with_more() {
        let tracker = PageTracker::new();
        assert_eq!(tracker.current(), PageCursor::FIRST);
        assert!(!tracker.has_loaded());
        assert!(tracker.has_more());
        assert_eq!(tracker.next_page(), Some(PageCursor::FIRST));
    }

    #[test]
    fn first_load_records_total() {
        let mut tracker = PageTracker::new();
        tracker.record_loaded(PageCursor::FIRST, 3);

        assert_eq!(tracker.current(), PageCursor::new(1));
        assert_eq!(tracker.total_pages(), Some(3));
        assert!(tracker.has_more());
        assert_eq!(tracker.next_page(), Some(PageCursor::new(2)));
    }

    #[test]
    fn has_more_false_on_last_page() {
        let mut tracker = PageTracker::new();
        tracker.record_loaded(PageCursor::new(1), 2);
        tracker.record_loaded(PageCursor::new(2), 2);

        assert!(!tracker.has_more());
        assert_eq!(tracker.next_page(), None);
    }

    #[test]
    fn single_page_listing_is_exhausted_after_first_load() {
        let mut tracker = PageTracker::new();
        tracker.record_loaded(PageCursor::FIRST, 1);
        assert!(!tracker.has_more());
    }

    #[test]
    fn cursor_never_decreases() {
        let mut tracker = PageTracker::new();
        tracker.record_loaded(PageCursor::new(1), 4);
        tracker.record_loaded(PageCursor::new(2), 4);
        tracker.record_loaded(PageCursor::new(1), 4);

        assert_eq!(tracker.current(), PageCursor::new(2));
        assert_eq!(tracker.next_page(), Some(PageCursor::new(3)));
    }

    #[test]
    fn has_more_matches_cursor_and_total_after_every_load() {
        let mut tracker = PageTracker::new();
        for (page, total) in [(1, 3), (2, 3), (3, 3)] {
            tracker.record_loaded(PageCursor::new(page), total);
            assert_eq!(
                tracker.has_more(),
                tracker.current().value() < tracker.total_pages().unwrap()
            );
        }
        assert!(!tracker.has_more());
    }

    #[test]
    fn shrinking_total_is_floored_at_cursor() {
        let mut tracker = PageTracker::new();
        tracker.record_loaded(PageCursor::new(1), 3);
        tracker.record_loaded(PageCursor::new(2), 1);

        assert_eq!(tracker.total_pages(), Some(2));
        assert!(!tracker.has_more());
    }

    #[test]
    fn reset_forgets_progress() {
        let mut tracker = PageTracker::new();
        tracker.record_loaded(PageCursor::new(1), 2);
        tracker.reset();
        assert_eq!(tracker, PageTracker::new());
    }
}
