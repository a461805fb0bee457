use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::progress::UserProgress;
use crate::model::subject::Subject;

//
// ─── CURRICULUM DERIVATION ─────────────────────────────────────────────────────
//
// Units and levels are a pure projection of two inputs: the maximum
// populated level per subject (from the content tables) and the current
// UserProgress. Nothing here is persisted or cached.
//

/// Maximum populated level number per subject, as reported by the content
/// store. A subject missing from the map has no content yet (max 0).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaxLevels {
    by_subject: BTreeMap<Subject, u32>,
}

impl MaxLevels {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, subject: Subject, max_level: u32) {
        self.by_subject.insert(subject, max_level);
    }

    #[must_use]
    pub fn with(mut self, subject: Subject, max_level: u32) -> Self {
        self.set(subject, max_level);
        self
    }

    #[must_use]
    pub fn get(&self, subject: Subject) -> u32 {
        self.by_subject.get(&subject).copied().unwrap_or(0)
    }
}

/// One numbered unit of practice within a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub subject: Subject,
    pub number: u32,
    pub is_completed: bool,
}

/// A display grouping of two consecutive level numbers across the unit
/// subjects. Unit `n` covers level numbers `2n-1` and `2n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    id: u32,
    levels: Vec<Level>,
}

impl Unit {
    #[must_use]
    pub fn new(id: u32, levels: Vec<Level>) -> Self {
        Self { id, levels }
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// The two level numbers this unit covers.
    #[must_use]
    pub fn level_numbers(&self) -> (u32, u32) {
        (2 * self.id - 1, 2 * self.id)
    }

    /// Completed fraction in `[0, 1]`; `0.0` when the unit has no levels.
    ///
    /// Recomputed from the level flags on every call rather than cached.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.levels.is_empty() {
            return 0.0;
        }
        let done = self.levels.iter().filter(|l| l.is_completed).count();
        done as f64 / self.levels.len() as f64
    }
}

/// Number of complete units, gated by the subject with the least content
/// so no unit is offered with a gap in any subject.
///
/// A unit subject with zero content caps the count at zero. This gating
/// applies to the aggregate Units view only; per-subject level pickers use
/// [`subject_levels`] instead.
#[must_use]
pub fn unit_count(max_levels: &MaxLevels) -> u32 {
    let min = Subject::UNIT_SUBJECTS
        .iter()
        .map(|s| max_levels.get(*s))
        .min()
        .unwrap_or(0);
    (min + 1) / 2
}

/// Derive the ordered list of units from content population and progress.
///
/// For each unit, levels are emitted per subject in canonical order, two
/// level numbers per subject.
#[must_use]
pub fn build_units(max_levels: &MaxLevels, progress: &UserProgress) -> Vec<Unit> {
    let count = unit_count(max_levels);
    (1..=count)
        .map(|id| {
            let mut levels = Vec::with_capacity(Subject::UNIT_SUBJECTS.len() * 2);
            for subject in Subject::UNIT_SUBJECTS {
                for number in [2 * id - 1, 2 * id] {
                    levels.push(Level {
                        subject,
                        number,
                        is_completed: progress.is_completed(subject, number),
                    });
                }
            }
            Unit::new(id, levels)
        })
        .collect()
}

/// Level list for a single subject's picker.
///
/// Deliberately not gated across subjects: a subject shows all of its own
/// populated levels regardless of how much content other subjects have.
#[must_use]
pub fn subject_levels(subject: Subject, max_level: u32, progress: &UserProgress) -> Vec<Level> {
    (1..=max_level)
        .map(|number| Level {
            subject,
            number,
            is_completed: progress.is_completed(subject, number),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max(p: u32, w: u32, s: u32, q: u32) -> MaxLevels {
        MaxLevels::new()
            .with(Subject::Phonetics, p)
            .with(Subject::WordBuilding, w)
            .with(Subject::SentenceReading, s)
            .with(Subject::Punctuation, q)
    }

    #[test]
    fn unit_count_is_gated_by_least_populated_subject() {
        assert_eq!(unit_count(&max(2, 0, 0, 0)), 0);
        assert_eq!(unit_count(&max(2, 2, 2, 2)), 1);
        assert_eq!(unit_count(&max(4, 4, 4, 4)), 2);
        assert_eq!(unit_count(&max(4, 4, 4, 3)), 2);
        assert_eq!(unit_count(&max(6, 4, 5, 4)), 2);
        assert_eq!(unit_count(&MaxLevels::new()), 0);
    }

    #[test]
    fn one_unit_carries_two_levels_per_subject() {
        let units = build_units(&max(2, 2, 2, 2), &UserProgress::new());
        assert_eq!(units.len(), 1);

        let unit = &units[0];
        assert_eq!(unit.id(), 1);
        assert_eq!(unit.level_numbers(), (1, 2));
        assert_eq!(unit.levels().len(), 8);

        let phonetics: Vec<u32> = unit
            .levels()
            .iter()
            .filter(|l| l.subject == Subject::Phonetics)
            .map(|l| l.number)
            .collect();
        assert_eq!(phonetics, vec![1, 2]);
    }

    #[test]
    fn unit_progress_is_completed_fraction() {
        let mut progress = UserProgress::new();
        progress.mark_completed(Subject::Phonetics, 1);
        progress.mark_completed(Subject::Phonetics, 2);
        progress.mark_completed(Subject::WordBuilding, 1);

        let units = build_units(&max(2, 2, 2, 2), &progress);
        // 8 levels, 3 completed.
        assert!((units[0].progress() - 0.375).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_unit_reports_zero_progress() {
        let unit = Unit::new(1, Vec::new());
        assert!(unit.progress().abs() < f64::EPSILON);
    }

    #[test]
    fn second_unit_covers_levels_three_and_four() {
        let units = build_units(&max(4, 4, 4, 4), &UserProgress::new());
        assert_eq!(units.len(), 2);
        assert_eq!(units[1].level_numbers(), (3, 4));
        assert!(units[1].levels().iter().all(|l| l.number >= 3));
    }

    #[test]
    fn subject_levels_ignore_other_subjects() {
        let mut progress = UserProgress::new();
        progress.mark_completed(Subject::ReadingComprehension, 1);

        // Other subjects empty; the picker still lists this subject's levels.
        let levels = subject_levels(Subject::ReadingComprehension, 3, &progress);
        assert_eq!(levels.len(), 3);
        assert!(levels[0].is_completed);
        assert!(!levels[1].is_completed);
    }

    #[test]
    fn subject_levels_empty_when_unpopulated() {
        assert!(subject_levels(Subject::Punctuation, 0, &UserProgress::new()).is_empty());
    }
}
