//! The persisted bookmark set.

use std::collections::HashSet;
use std::sync::Arc;

use crate::storage::{self, Storage};

/// Storage key holding the bookmarked repository ids.
pub const BOOKMARKS_KEY: &str = "bookmarked_repo_ids";

/// Ordered set of bookmarked repository ids.
///
/// Ids keep their insertion order; the bookmarked-only view fetches them in
/// that order. Every mutation persists the whole set synchronously through
/// the storage adapter, which absorbs write failures and leaves the
/// in-memory set authoritative for the session.
#[derive(Clone)]
pub struct BookmarkStore {
    ids: Vec<u64>,
    storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for BookmarkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookmarkStore")
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl BookmarkStore {
    /// Load the bookmark set from storage.
    ///
    /// An absent, unreadable or malformed value yields an empty set.
    /// Duplicate ids in the stored value are dropped, keeping the first
    /// occurrence.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let ids: Vec<u64> = storage::load_json(storage.as_ref(), BOOKMARKS_KEY, Vec::new());
        Self {
            ids: dedup_preserving_order(ids),
            storage,
        }
    }

    /// Whether `id` is bookmarked.
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    /// Bookmark `id`. No effect when already present.
    pub fn add(&mut self, id: u64) {
        if !self.contains(id) {
            self.ids.push(id);
            self.persist();
        }
    }

    /// Remove `id` from the set. No effect when absent.
    pub fn remove(&mut self, id: u64) {
        let before = self.ids.len();
        self.ids.retain(|&existing| existing != id);
        if self.ids.len() != before {
            self.persist();
        }
    }

    /// Toggle `id`, returning whether it is bookmarked afterwards.
    pub fn toggle(&mut self, id: u64) -> bool {
        if self.contains(id) {
            self.remove(id);
            false
        } else {
            self.add(id);
            true
        }
    }

    /// The bookmarked ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Number of bookmarked ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn persist(&self) {
        storage::save_json(self.storage.as_ref(), BOOKMARKS_KEY, &self.ids);
    }
}

fn dedup_preserving_order(ids: Vec<u64>) -> Vec<u64> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
