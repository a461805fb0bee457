use crate::model::curriculum::Level;

//
// ─── UNLOCK POLICY ─────────────────────────────────────────────────────────────
//

/// Which of the given levels are playable right now.
///
/// A level is unlocked when it is completed, or when it is the first
/// incomplete level in the canonical ordering (level number ascending,
/// then subject order for mixed-subject lists). Everything after that
/// single "next" level is locked.
///
/// The returned flags are aligned with the input slice, whatever its
/// display order.
#[must_use]
pub fn unlock_flags(levels: &[Level]) -> Vec<bool> {
    let next = levels
        .iter()
        .enumerate()
        .filter(|(_, level)| !level.is_completed)
        .min_by_key(|(_, level)| (level.number, level.subject.rank()))
        .map(|(index, _)| index);

    levels
        .iter()
        .enumerate()
        .map(|(index, level)| level.is_completed || Some(index) == next)
        .collect()
}

/// Convenience form of [`unlock_flags`] for a single level.
#[must_use]
pub fn is_unlocked(levels: &[Level], index: usize) -> bool {
    unlock_flags(levels).get(index).copied().unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::subject::Subject;

    fn level(subject: Subject, number: u32, is_completed: bool) -> Level {
        Level {
            subject,
            number,
            is_completed,
        }
    }

    #[test]
    fn completed_plus_single_next_are_unlocked() {
        let levels = vec![
            level(Subject::Phonetics, 1, true),
            level(Subject::Phonetics, 2, true),
            level(Subject::Phonetics, 3, false),
            level(Subject::Phonetics, 4, false),
        ];
        assert_eq!(unlock_flags(&levels), vec![true, true, true, false]);
    }

    #[test]
    fn nothing_completed_unlocks_only_the_first() {
        let levels = vec![
            level(Subject::Phonetics, 1, false),
            level(Subject::Phonetics, 2, false),
        ];
        assert_eq!(unlock_flags(&levels), vec![true, false]);
    }

    #[test]
    fn all_completed_means_all_unlocked() {
        let levels = vec![
            level(Subject::Phonetics, 1, true),
            level(Subject::Phonetics, 2, true),
        ];
        assert_eq!(unlock_flags(&levels), vec![true, true]);
    }

    #[test]
    fn gap_completion_still_points_at_earliest_incomplete() {
        // Level 3 was completed out of order; 1 is still the next level.
        let levels = vec![
            level(Subject::Phonetics, 1, false),
            level(Subject::Phonetics, 2, false),
            level(Subject::Phonetics, 3, true),
        ];
        assert_eq!(unlock_flags(&levels), vec![true, false, true]);
    }

    #[test]
    fn mixed_subject_list_breaks_ties_by_subject_order() {
        // Subject-major display order, as in a unit's level list. Both
        // phonetics levels are done; the next level is word-building 1,
        // which ties with sentence-reading 1 on number and wins on rank.
        let levels = vec![
            level(Subject::Phonetics, 1, true),
            level(Subject::Phonetics, 2, true),
            level(Subject::WordBuilding, 1, false),
            level(Subject::WordBuilding, 2, false),
            level(Subject::SentenceReading, 1, false),
            level(Subject::SentenceReading, 2, false),
        ];
        assert_eq!(
            unlock_flags(&levels),
            vec![true, true, true, false, false, false]
        );
    }

    #[test]
    fn is_unlocked_out_of_range_is_false() {
        let levels = vec![level(Subject::Phonetics, 1, false)];
        assert!(is_unlocked(&levels, 0));
        assert!(!is_unlocked(&levels, 5));
    }

    #[test]
    fn empty_list_has_no_unlocks() {
        assert!(unlock_flags(&[]).is_empty());
    }
}
