//! The snapshot artifact consumed by the dashboard
//!
//! Field names and nesting are the dashboard's contract and must not change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Author, AuthorId, PullRequest, Reviewer, ReviewerId, Team, TeamId};

/// Implemented by registry entries that count the pull requests referencing them.
pub trait PullCounted {
    fn record_pull(&mut self);
}

/// Deduplicated entities keyed by upstream id.
///
/// Entries are inserted on first reference and never removed; each reference
/// increments the entry's pull count. Serializes as a plain JSON object in
/// ascending key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry<K: Ord, V> {
    entries: BTreeMap<K, V>,
}

impl<K: Ord, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone, V: PullCounted> Registry<K, V> {
    /// Looks up `id`, inserting `make()` when absent, and counts one more pull
    /// request against it.
    pub fn reference(&mut self, id: &K, make: impl FnOnce() -> V) -> &V {
        let entry = self.entries.entry(id.clone()).or_insert_with(make);
        entry.record_pull();
        entry
    }
}

impl<K: Ord, V> Registry<K, V> {
    pub fn get(&self, id: &K) -> Option<&V> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }
}

/// The three global registries populated while a run normalizes pull requests.
#[derive(Debug, Clone, Default)]
pub struct Registries {
    pub authors: Registry<AuthorId, Author>,
    pub teams: Registry<TeamId, Team>,
    pub reviewers: Registry<ReviewerId, Reviewer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Milliseconds since the Unix epoch
    pub generated_at: i64,
    pub teams: Registry<TeamId, Team>,
    pub reviewers: Registry<ReviewerId, Reviewer>,
    pub authors: Registry<AuthorId, Author>,
    pub pulls: Vec<PullRequest>,
}

impl Snapshot {
    /// Freezes the registries of a finished run into a snapshot.
    pub fn new(generated_at: i64, registries: Registries, pulls: Vec<PullRequest>) -> Self {
        let Registries {
            authors,
            teams,
            reviewers,
        } = registries;

        Self {
            generated_at,
            teams,
            reviewers,
            authors,
            pulls,
        }
    }
}
