//! Displayed collection and modification overlay for Roster.
//!
//! This module provides the two pieces of list state that a page merge
//! reconciles:
//! - [`UserCollection`]: insertion-ordered users, deduplicated by id
//! - [`ModificationOverlay`]: locally edited records that take precedence over
//!   whatever the server returns for the same id
//!
//! Merge order for a fetched page:
//! 1. substitute the overlay version of each record, if any
//! 2. drop ids removed during this session
//! 3. append only ids not already displayed

use std::collections::{HashMap, HashSet};
use roster_types::{User, UserId};

/// Sequence number ordering writes to the overlay.
///
/// Tickets are handed out when an update is submitted, so the last submitted
/// edit wins even if responses arrive out of order. A ticket belongs to the
/// overlay generation it was reserved in and is void after a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WriteTicket {
    generation: u64,
    seq: u64,
}

impl WriteTicket {
    /// The raw sequence value.
    pub fn value(&self) -> u64 {
        self.seq
    }

    /// The overlay generation this ticket was reserved in.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// An overlay entry: the edited record and the write that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayEntry {
    /// The locally edited record.
    pub user: User,
    /// Ticket of the write that stored it.
    pub ticket: WriteTicket,
}

/// Locally edited records keyed by id.
///
/// Authoritative over the server's copy until the record is deleted.
#[derive(Debug, Clone, Default)]
pub struct ModificationOverlay {
    entries: HashMap<UserId, OverlayEntry>,
    next_seq: u64,
    generation: u64,
}

impl ModificationOverlay {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next write ticket.
    pub fn reserve(&mut self) -> WriteTicket {
        self.next_seq += 1;
        WriteTicket {
            generation: self.generation,
            seq: self.next_seq,
        }
    }

    /// Whether `ticket` was reserved since the last reset.
    pub fn is_current(&self, ticket: WriteTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Store `user` under `ticket`.
    ///
    /// Returns `false` (and stores nothing) when the ticket predates the last
    /// reset or a newer ticket already wrote this id.
    pub fn record(&mut self, ticket: WriteTicket, user: User) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        if let Some(existing) = self.entries.get(&user.id) {
            if existing.ticket > ticket {
                return false;
            }
        }
        self.entries.insert(user.id, OverlayEntry { user, ticket });
        true
    }

    /// The overlay version of `id`, if edited.
    pub fn get(&self, id: UserId) -> Option<&User> {
        self.entries.get(&id).map(|entry| &entry.user)
    }

    /// Drop the entry for `id`.
    pub fn remove(&mut self, id: UserId) -> Option<User> {
        self.entries.remove(&id).map(|entry| entry.user)
    }

    /// Whether `id` has a local edit.
    pub fn contains(&self, id: UserId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Substitute the overlay version of `user`, if any.
    pub fn resolve(&self, user: User) -> User {
        match self.entries.get(&user.id) {
            Some(entry) => entry.user.clone(),
            None => user,
        }
    }

    /// Number of edited records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no record has been edited.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Ticket numbering continues.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop every entry and void all outstanding tickets.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.generation += 1;
    }
}

/// Insertion-ordered users, deduplicated by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserCollection {
    users: Vec<User>,
}

impl UserCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// All displayed users in order.
    pub fn as_slice(&self) -> &[User] {
        &self.users
    }

    /// Number of displayed users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether nothing is displayed.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Whether `id` is displayed.
    pub fn contains(&self, id: UserId) -> bool {
        self.users.iter().any(|user| user.id == id)
    }

    /// The displayed record for `id`.
    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Ids in display order.
    pub fn ids(&self) -> Vec<UserId> {
        self.users.iter().map(|user| user.id).collect()
    }

    /// Merge a fetched page.
    ///
    /// Returns the number of records appended. Merging the same page twice
    /// appends nothing the second time.
    pub fn merge_page(
        &mut self,
        page: Vec<User>,
        overlay: &ModificationOverlay,
        removed: &HashSet<UserId>,
    ) -> usize {
        let mut present: HashSet<UserId> = self.users.iter().map(|user| user.id).collect();
        let mut added = 0;

        for user in page {
            if removed.contains(&user.id) || !present.insert(user.id) {
                continue;
            }
            self.users.push(overlay.resolve(user));
            added += 1;
        }

        added
    }

    /// Replace the record with the same id in place.
    ///
    /// Returns `false` if the id is not displayed.
    pub fn replace(&mut self, user: User) -> bool {
        match self.users.iter_mut().find(|existing| existing.id == user.id) {
            Some(slot) => {
                *slot = user;
                true
            }
            None => false,
        }
    }

    /// Remove the record for `id`.
    pub fn remove(&mut self, id: UserId) -> Option<User> {
        let index = self.users.iter().position(|user| user.id == id)?;
        Some(self.users.remove(index))
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.users.clear();
    }
}
