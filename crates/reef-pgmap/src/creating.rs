//! Tracker for placement groups still being created.

use std::collections::hash_set;
use std::collections::HashSet;

use reef_core::PgId;

/// The set of placement groups whose current snapshot carries the
/// `CREATING` flag.
///
/// Derived state: maintained by the aggregate engine's add/sub hooks and
/// rebuilt from the pg table on load, never persisted. Membership only;
/// iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatingSet(HashSet<PgId>);

impl CreatingSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a group id. Returns true if it was not already present.
    pub fn insert(&mut self, id: PgId) -> bool {
        self.0.insert(id)
    }

    /// Drops a group id. Returns true if it was present.
    pub fn remove(&mut self, id: PgId) -> bool {
        self.0.remove(&id)
    }

    /// Returns true if the group is in the set.
    #[must_use]
    pub fn contains(&self, id: PgId) -> bool {
        self.0.contains(&id)
    }

    /// Number of groups currently creating.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no group is currently creating.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the member ids.
    pub fn iter(&self) -> hash_set::Iter<'_, PgId> {
        self.0.iter()
    }

    /// Removes every member.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<'a> IntoIterator for &'a CreatingSet {
    type Item = &'a PgId;
    type IntoIter = hash_set::Iter<'a, PgId>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
