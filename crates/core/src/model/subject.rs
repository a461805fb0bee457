use std::fmt;

use serde::{Deserialize, Serialize};

/// A top-level content domain.
///
/// The set is closed by design: unknown subjects are a compile-time concern,
/// never a runtime lookup failure. The enum ordering is the canonical
/// ordering used for display and for unlock sequencing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Phonetics,
    WordBuilding,
    SentenceReading,
    Punctuation,
    ReadingComprehension,
}

impl Subject {
    /// Every subject, in canonical order.
    pub const ALL: [Subject; 5] = [
        Subject::Phonetics,
        Subject::WordBuilding,
        Subject::SentenceReading,
        Subject::Punctuation,
        Subject::ReadingComprehension,
    ];

    /// Subjects that participate in mixed units.
    ///
    /// Reading comprehension is reachable only through its own level picker
    /// and never contributes levels to a unit.
    pub const UNIT_SUBJECTS: [Subject; 4] = [
        Subject::Phonetics,
        Subject::WordBuilding,
        Subject::SentenceReading,
        Subject::Punctuation,
    ];

    /// Stable storage key for this subject.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Subject::Phonetics => "phonetics",
            Subject::WordBuilding => "word_building",
            Subject::SentenceReading => "sentence_reading",
            Subject::Punctuation => "punctuation",
            Subject::ReadingComprehension => "reading_comprehension",
        }
    }

    /// Parse a storage key produced by [`Subject::as_str`].
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "phonetics" => Some(Subject::Phonetics),
            "word_building" => Some(Subject::WordBuilding),
            "sentence_reading" => Some(Subject::SentenceReading),
            "punctuation" => Some(Subject::Punctuation),
            "reading_comprehension" => Some(Subject::ReadingComprehension),
            _ => None,
        }
    }

    /// Position of this subject in the canonical ordering.
    #[must_use]
    pub fn rank(self) -> usize {
        Subject::ALL
            .iter()
            .position(|s| *s == self)
            .unwrap_or(Subject::ALL.len())
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for subject in Subject::ALL {
            assert_eq!(Subject::from_key(subject.as_str()), Some(subject));
        }
        assert_eq!(Subject::from_key("algebra"), None);
    }

    #[test]
    fn canonical_order_is_enum_order() {
        let ranks: Vec<usize> = Subject::ALL.iter().map(|s| s.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn unit_subjects_exclude_comprehension() {
        assert!(
            !Subject::UNIT_SUBJECTS
                .iter()
                .any(|s| *s == Subject::ReadingComprehension)
        );
    }
}
