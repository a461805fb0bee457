use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::subject::Subject;

/// The single persisted progress record for the installation.
///
/// There is exactly one of these per device; an absent stored record is
/// everywhere treated as the default-empty value, never as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    completed: BTreeMap<Subject, BTreeSet<u32>>,
}

impl UserProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted `(subject, level)` pairs.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Subject, u32)>) -> Self {
        let mut progress = Self::new();
        for (subject, level) in pairs {
            progress.mark_completed(subject, level);
        }
        progress
    }

    /// Record a completed level.
    ///
    /// Level numbers are 1-based; zero is ignored. Returns `false` when the
    /// level was already recorded, which makes repeated calls a no-op.
    /// Out-of-order completion is permitted here; ordering is the unlock
    /// policy's concern.
    pub fn mark_completed(&mut self, subject: Subject, level: u32) -> bool {
        if level == 0 {
            return false;
        }
        self.completed.entry(subject).or_default().insert(level)
    }

    #[must_use]
    pub fn is_completed(&self, subject: Subject, level: u32) -> bool {
        self.completed
            .get(&subject)
            .is_some_and(|levels| levels.contains(&level))
    }

    /// Completed level numbers for a subject, ascending.
    #[must_use]
    pub fn completed_for(&self, subject: Subject) -> Vec<u32> {
        self.completed
            .get(&subject)
            .map(|levels| levels.iter().copied().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn completed_count(&self, subject: Subject) -> usize {
        self.completed.get(&subject).map_or(0, BTreeSet::len)
    }

    /// All `(subject, level)` pairs, for persistence.
    pub fn pairs(&self) -> impl Iterator<Item = (Subject, u32)> + '_ {
        self.completed
            .iter()
            .flat_map(|(subject, levels)| levels.iter().map(|level| (*subject, *level)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.values().all(BTreeSet::is_empty)
    }
}
