//! Load state machine for Roster.
//!
//! This module provides a pure, side-effect-free state machine for the page
//! loading lifecycle. The state machine takes events as input and produces a
//! new state plus a list of actions to execute.
//!
//! The actual I/O (fetching a page) is performed by roster-client, not by
//! this module.

use roster_types::PageCursor;

/// Page loading state - NO I/O, just state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListState {
    /// No fetch in flight.
    #[default]
    Idle,
    /// A page fetch is in flight.
    Loading {
        /// The page being fetched.
        page: PageCursor,
    },
    /// The last fetch failed. Left only by a new load request.
    Error {
        /// The page that failed.
        page: PageCursor,
        /// Message shown to the user.
        message: String,
    },
}

impl ListState {
    /// Create a new state machine in the Idle state.
    pub fn new() -> Self {
        Self::Idle
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects.
    pub fn on_event(self, event: Event) -> (Self, Vec<Action>) {
        match (self, event) {
            // Start a fetch
            (Self::Idle, Event::LoadRequested { page })
            | (Self::Error { .. }, Event::LoadRequested { page }) => (
                Self::Loading { page },
                vec![
                    Action::FetchPage { page },
                    Action::EmitEvent(ListEvent::LoadStarted { page }),
                ],
            ),

            // One fetch at a time
            (state @ Self::Loading { .. }, Event::LoadRequested { page }) => (
                state,
                vec![Action::EmitEvent(ListEvent::LoadSuppressed { page })],
            ),

            // Fetch resolved
            (Self::Loading { page }, Event::PageLoaded { page: loaded }) if page == loaded => (
                Self::Idle,
                vec![
                    Action::MergePage { page },
                    Action::EmitEvent(ListEvent::PageMerged { page }),
                ],
            ),
            (Self::Loading { page }, Event::PageFailed { page: failed, error })
                if page == failed =>
            {
                (
                    Self::Error {
                        page,
                        message: error.clone(),
                    },
                    vec![Action::EmitEvent(ListEvent::LoadFailed { page, error })],
                )
            }

            // Stale or out-of-order results - stay in current state
            (state, _) => (state, vec![]),
        }
    }

    /// Check if a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// The fetch error message, if the last fetch failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Events that can occur in the loading lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A page load was requested (mount, incremental load, backfill).
    LoadRequested {
        /// The page to fetch.
        page: PageCursor,
    },
    /// The fetch for `page` succeeded.
    PageLoaded {
        /// The page that loaded.
        page: PageCursor,
    },
    /// The fetch for `page` failed.
    PageFailed {
        /// The page that failed.
        page: PageCursor,
        /// Message describing the failure.
        error: String,
    },
}

/// Actions to be executed by the engine or the client.
///
/// These are instructions, not side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Request `page` from the API.
    FetchPage {
        /// The page to fetch.
        page: PageCursor,
    },
    /// Merge the fetched page into the displayed collection.
    MergePage {
        /// The page to merge.
        page: PageCursor,
    },
    /// Emit an event to the application.
    EmitEvent(ListEvent),
}

/// Events emitted to the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// A fetch started; show the loading indicator.
    LoadStarted {
        /// The page being fetched.
        page: PageCursor,
    },
    /// A load request arrived while another fetch was in flight.
    LoadSuppressed {
        /// The page that was requested.
        page: PageCursor,
    },
    /// A page merged into the collection.
    PageMerged {
        /// The merged page.
        page: PageCursor,
    },
    /// A fetch failed.
    LoadFailed {
        /// The page that failed.
        page: PageCursor,
        /// Message describing the failure.
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u32) -> PageCursor {
        PageCursor::new(n)
    }

    #[test]
    fn starts_idle() {
        let state = ListState::new();
        assert!(matches!(state, ListState::Idle));
        assert!(!state.is_loading());
        assert!(state.error().is_none());
    }

    #[test]
    fn load_request_transitions_to_loading() {
        let (state, actions) = ListState::Idle.on_event(Event::LoadRequested { page: page(1) });

        assert_eq!(state, ListState::Loading { page: page(1) });
        assert!(actions
            .iter()
            .any(|a| matches!(a, Action::FetchPage { page } if *page == PageCursor::FIRST)));
    }

    #[test]
    fn load_request_while_loading_is_suppressed() {
        let state = ListState::Loading { page: page(2) };
        let (state, actions) = state.on_event(Event::LoadRequested { page: page(3) });

        assert_eq!(state, ListState::Loading { page: page(2) });
        assert!(!actions.iter().any(|a| matches!(a, Action::FetchPage { .. })));
        assert!(actions
            .iter()
            .any(|a| matches!(a, Action::EmitEvent(ListEvent::LoadSuppressed { .. }))));
    }

    #[test]
    fn page_loaded_returns_to_idle_and_merges() {
        let state = ListState::Loading { page: page(1) };
        let (state, actions) = state.on_event(Event::PageLoaded { page: page(1) });

        assert_eq!(state, ListState::Idle);
        assert!(actions
            .iter()
            .any(|a| matches!(a, Action::MergePage { page } if *page == PageCursor::FIRST)));
    }

    #[test]
    fn page_failure_records_error() {
        let state = ListState::Loading { page: page(2) };
        let (state, actions) = state.on_event(Event::PageFailed {
            page: page(2),
            error: "boom".into(),
        });

        assert_eq!(state.error(), Some("boom"));
        assert!(!state.is_loading());
        assert!(actions
            .iter()
            .any(|a| matches!(a, Action::EmitEvent(ListEvent::LoadFailed { .. }))));
    }

    #[test]
    fn error_is_left_only_by_a_new_load_request() {
        let state = ListState::Error {
            page: page(2),
            message: "boom".into(),
        };

        let (state, actions) = state.on_event(Event::PageLoaded { page: page(2) });
        assert!(state.error().is_some());
        assert!(actions.is_empty());

        let (state, actions) = state.on_event(Event::LoadRequested { page: page(2) });
        assert_eq!(state, ListState::Loading { page: page(2) });
        assert!(actions.iter().any(|a| matches!(a, Action::FetchPage { .. })));
    }

    #[test]
    fn stale_result_for_another_page_is_ignored() {
        let state = ListState::Loading { page: page(3) };
        let (state, actions) = state.on_event(Event::PageLoaded { page: page(2) });

        assert_eq!(state, ListState::Loading { page: page(3) });
        assert!(actions.is_empty());
    }

    #[test]
    fn results_while_idle_are_ignored() {
        let (state, actions) = ListState::Idle.on_event(Event::PageFailed {
            page: page(1),
            error: "late".into(),
        });
        assert_eq!(state, ListState::Idle);
        assert!(actions.is_empty());
    }
}
