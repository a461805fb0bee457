use serde::{Deserialize, Serialize};

use crate::model::content::{Phoneme, PunctuationQuestion, Sentence, Word};
use crate::model::subject::Subject;

/// A question drawn for a practice or mixed-quiz session.
///
/// Immutable once drawn; comprehension questions are handled by their own
/// screen and never appear in mixed quizzes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizQuestion {
    Phoneme(Phoneme),
    Word(Word),
    Sentence(Sentence),
    Punctuation(PunctuationQuestion),
}

impl QuizQuestion {
    #[must_use]
    pub fn subject(&self) -> Subject {
        match self {
            QuizQuestion::Phoneme(_) => Subject::Phonetics,
            QuizQuestion::Word(_) => Subject::WordBuilding,
            QuizQuestion::Sentence(_) => Subject::SentenceReading,
            QuizQuestion::Punctuation(_) => Subject::Punctuation,
        }
    }

    /// Text shown to the learner for this question.
    #[must_use]
    pub fn prompt(&self) -> String {
        match self {
            QuizQuestion::Phoneme(p) => p.sample_word.clone(),
            QuizQuestion::Word(w) => w.text.clone(),
            QuizQuestion::Sentence(s) => s.with_blank(),
            QuizQuestion::Punctuation(q) => q.prompt.clone(),
        }
    }

    /// Answer option strings for multiple-choice questions; empty for
    /// free-entry questions.
    #[must_use]
    pub fn options(&self) -> &[String] {
        match self {
            QuizQuestion::Punctuation(q) => &q.options,
            _ => &[],
        }
    }

    /// The answer strings accepted as correct.
    #[must_use]
    pub fn accepted_answers(&self) -> Vec<&str> {
        match self {
            QuizQuestion::Phoneme(p) => vec![p.symbol.as_str()],
            QuizQuestion::Word(w) => vec![w.text.as_str()],
            QuizQuestion::Sentence(s) => vec![s.target_word.as_str()],
            QuizQuestion::Punctuation(q) => vec![q.answer.as_str()],
        }
    }

    /// Judge a submitted answer: whitespace-trimmed, case-insensitive exact
    /// match against any accepted answer.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        let given = answer.trim().to_lowercase();
        self.accepted_answers()
            .iter()
            .any(|accepted| accepted.trim().to_lowercase() == given)
    }
}
