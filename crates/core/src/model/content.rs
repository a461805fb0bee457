use serde::{Deserialize, Serialize};

use crate::model::ids::{ContentId, TextId};
use crate::model::subject::Subject;

//
// ─── CONTENT ENTITIES ──────────────────────────────────────────────────────────
//
// Content rows are created once at install-time population and immutable
// afterward, so they are plain records rather than validated builders.
//

/// A phoneme to practice, with a sample word that uses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phoneme {
    pub id: ContentId,
    pub symbol: String,
    pub sample_word: String,
    pub level: u32,
}

/// A word for the word-building exercise. The word text itself is the
/// canonical answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: ContentId,
    pub text: String,
    pub level: u32,
}

/// A sentence for the sentence-reading exercise, rendered with
/// `target_word` blanked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: ContentId,
    pub text: String,
    pub target_word: String,
    pub level: u32,
}

/// A multiple-choice punctuation question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunctuationQuestion {
    pub id: ContentId,
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
    pub level: u32,
}

/// A reading-comprehension passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComprehensionText {
    pub id: TextId,
    pub title: String,
    pub body: String,
    pub level: u32,
}

/// A multiple-choice question attached to a comprehension passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComprehensionQuestion {
    pub id: ContentId,
    pub text_id: TextId,
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl Phoneme {
    #[must_use]
    pub fn subject() -> Subject {
        Subject::Phonetics
    }
}

impl Word {
    #[must_use]
    pub fn subject() -> Subject {
        Subject::WordBuilding
    }
}

impl Sentence {
    #[must_use]
    pub fn subject() -> Subject {
        Subject::SentenceReading
    }

    /// The sentence with the target word replaced by a blank, as shown to
    /// the learner.
    #[must_use]
    pub fn with_blank(&self) -> String {
        self.text.replace(self.target_word.as_str(), "____")
    }
}

impl PunctuationQuestion {
    #[must_use]
    pub fn subject() -> Subject {
        Subject::Punctuation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentence_blank_replaces_target() {
        let sentence = Sentence {
            id: ContentId::new(1),
            text: "The cat sat on the mat.".into(),
            target_word: "cat".into(),
            level: 1,
        };
        assert_eq!(sentence.with_blank(), "The ____ sat on the mat.");
    }
}
