use std::fmt;

use rand::seq::SliceRandom;
use reader_core::model::QuizQuestion;

use crate::error::QuizError;

//
// ─── QUIZ SESSION ──────────────────────────────────────────────────────────────
//

/// Final tally exposed once a session completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSummary {
    pub score: u32,
    pub total_questions: usize,
}

/// Result of a successful [`QuizSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAdvance {
    /// Moved on; the session now shows the question at this index.
    Next { index: usize },
    /// The last question was answered; the session is complete.
    Completed(QuizSummary),
}

/// In-memory state machine for one play session.
///
/// Lives only for the lifetime of the session and is never persisted;
/// abandoning a session is simply dropping the value. Completion is the
/// caller's trigger point for marking the practiced level complete.
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    score: u32,
    current_answer: Option<String>,
    answer_correct: Option<bool>,
    completed: bool,
}

impl QuizSession {
    /// Start a session over an ordered question list.
    ///
    /// Question order is preserved; mixed quizzes arrive pre-shuffled from
    /// their generator, practice screens use [`QuizSession::start_shuffled`].
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` for an empty question list.
    pub fn start(questions: Vec<QuizQuestion>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }
        Ok(Self {
            questions,
            current: 0,
            score: 0,
            current_answer: None,
            answer_correct: None,
            completed: false,
        })
    }

    /// Start a session with the questions shuffled once up front.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` for an empty question list.
    pub fn start_shuffled(mut questions: Vec<QuizQuestion>) -> Result<Self, QuizError> {
        let mut rng = rand::rng();
        questions.shuffle(&mut rng);
        Self::start(questions)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.completed {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// The answer submitted for the current question, if any.
    #[must_use]
    pub fn submitted_answer(&self) -> Option<&str> {
        self.current_answer.as_deref()
    }

    /// Judgement for the current question; `None` until an answer is
    /// submitted.
    #[must_use]
    pub fn is_answer_correct(&self) -> Option<bool> {
        self.answer_correct
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Final summary, available once the session has completed.
    #[must_use]
    pub fn summary(&self) -> Option<QuizSummary> {
        self.completed.then_some(QuizSummary {
            score: self.score,
            total_questions: self.questions.len(),
        })
    }

    /// Judge an answer for the current question.
    ///
    /// The score is incremented exactly once per question; re-submission
    /// before advancing is rejected so it can never double-count.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` after the session has finished and
    /// `QuizError::AlreadyAnswered` when the current question was already
    /// judged.
    pub fn submit_answer(&mut self, answer: &str) -> Result<bool, QuizError> {
        if self.completed {
            return Err(QuizError::Completed);
        }
        if self.answer_correct.is_some() {
            return Err(QuizError::AlreadyAnswered);
        }

        let correct = self.questions[self.current].is_correct(answer);
        if correct {
            self.score += 1;
        }
        self.current_answer = Some(answer.to_string());
        self.answer_correct = Some(correct);
        Ok(correct)
    }

    /// Move to the next question, or complete the session after the last
    /// one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` after the session has finished and
    /// `QuizError::NotAnswered` when the current question has not been
    /// judged yet.
    pub fn advance(&mut self) -> Result<QuizAdvance, QuizError> {
        if self.completed {
            return Err(QuizError::Completed);
        }
        if self.answer_correct.is_none() {
            return Err(QuizError::NotAnswered);
        }

        self.current_answer = None;
        self.answer_correct = None;

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            Ok(QuizAdvance::Next {
                index: self.current,
            })
        } else {
            self.completed = true;
            Ok(QuizAdvance::Completed(QuizSummary {
                score: self.score,
                total_questions: self.questions.len(),
            }))
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use reader_core::model::{ContentId, Word};

    fn word_question(id: u64, text: &str) -> QuizQuestion {
        QuizQuestion::Word(Word {
            id: ContentId::new(id),
            text: text.into(),
            level: 1,
        })
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let err = QuizSession::start(Vec::new()).unwrap_err();
        assert_eq!(err, QuizError::Empty);
    }

    #[test]
    fn full_walkthrough_scores_and_completes() {
        let mut session =
            QuizSession::start(vec![word_question(1, "cat"), word_question(2, "dog")]).unwrap();

        assert_eq!(session.current_index(), 0);
        assert!(session.submit_answer("cat").unwrap());
        assert_eq!(session.score(), 1);
        assert_eq!(session.is_answer_correct(), Some(true));

        assert_eq!(session.advance().unwrap(), QuizAdvance::Next { index: 1 });
        assert_eq!(session.is_answer_correct(), None);
        assert!(session.submitted_answer().is_none());

        assert!(!session.submit_answer("cow").unwrap());
        assert_eq!(session.score(), 1);
        assert_eq!(session.is_answer_correct(), Some(false));

        let advance = session.advance().unwrap();
        assert_eq!(
            advance,
            QuizAdvance::Completed(QuizSummary {
                score: 1,
                total_questions: 2,
            })
        );
        assert!(session.is_complete());
        assert_eq!(
            session.summary(),
            Some(QuizSummary {
                score: 1,
                total_questions: 2
            })
        );
    }

    #[test]
    fn resubmission_never_double_counts() {
        let mut session = QuizSession::start(vec![word_question(1, "cat")]).unwrap();
        assert!(session.submit_answer("cat").unwrap());
        assert_eq!(
            session.submit_answer("cat").unwrap_err(),
            QuizError::AlreadyAnswered
        );
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn advance_requires_a_judged_answer() {
        let mut session = QuizSession::start(vec![word_question(1, "cat")]).unwrap();
        assert_eq!(session.advance().unwrap_err(), QuizError::NotAnswered);
    }

    #[test]
    fn completed_session_is_terminal() {
        let mut session = QuizSession::start(vec![word_question(1, "cat")]).unwrap();
        session.submit_answer("cat").unwrap();
        assert!(matches!(
            session.advance().unwrap(),
            QuizAdvance::Completed(_)
        ));

        assert_eq!(session.submit_answer("cat").unwrap_err(), QuizError::Completed);
        assert_eq!(session.advance().unwrap_err(), QuizError::Completed);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn shuffled_start_keeps_all_questions() {
        let questions: Vec<QuizQuestion> = (1..=8)
            .map(|i| word_question(i, &format!("word{i}")))
            .collect();
        let session = QuizSession::start_shuffled(questions).unwrap();
        assert_eq!(session.total_questions(), 8);
    }
}
