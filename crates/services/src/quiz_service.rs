use std::sync::Arc;

use rand::seq::{IndexedRandom, SliceRandom};
use reader_core::model::{
    ComprehensionQuestion, ComprehensionText, QuizQuestion, Subject, Unit,
};
use storage::repository::ContentRepository;

use crate::error::QuizServiceError;

/// A comprehension passage paired with its questions, for the reading
/// screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComprehensionPassage {
    pub text: ComprehensionText,
    pub questions: Vec<ComprehensionQuestion>,
}

/// Assembles question lists for practice sessions and mixed quizzes.
pub struct QuizService {
    content: Arc<dyn ContentRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(content: Arc<dyn ContentRepository>) -> Self {
        Self { content }
    }

    /// Questions for one subject at one level.
    ///
    /// When the requested level has no rows, falls back to the nearest
    /// lower populated level; only a subject with no content at any level
    /// reports `NoContent`, which presentation renders as a "nothing to
    /// show" state.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NoContent` when the subject has no usable
    /// content, or a storage error.
    pub async fn practice_questions(
        &self,
        subject: Subject,
        level: u32,
    ) -> Result<Vec<QuizQuestion>, QuizServiceError> {
        let mut at = level;
        while at >= 1 {
            let questions = self.questions_at(subject, at).await?;
            if !questions.is_empty() {
                return Ok(questions);
            }
            at -= 1;
        }
        Err(QuizServiceError::NoContent { subject, level })
    }

    /// A comprehension passage for the given level, with the same
    /// nearest-lower-level fallback as practice questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NoContent` when no passage exists at any
    /// level, or a storage error.
    pub async fn comprehension_passage(
        &self,
        level: u32,
    ) -> Result<ComprehensionPassage, QuizServiceError> {
        let mut at = level;
        while at >= 1 {
            let texts = self.content.comprehension_texts_at(at).await?;
            if let Some(text) = texts.choose(&mut rand::rng()).cloned() {
                let questions = self.content.comprehension_questions(text.id).await?;
                return Ok(ComprehensionPassage { text, questions });
            }
            at -= 1;
        }
        Err(QuizServiceError::NoContent {
            subject: Subject::ReadingComprehension,
            level,
        })
    }

    /// Sample a mixed quiz across the unit's subjects and two level
    /// numbers, shuffled once here so sessions can preserve the order.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::EmptyUnit` when no subject has content at
    /// the unit's levels, or a storage error.
    pub async fn mixed_quiz(
        &self,
        unit: &Unit,
        per_subject: usize,
    ) -> Result<Vec<QuizQuestion>, QuizServiceError> {
        let (first, second) = unit.level_numbers();
        let mut rng = rand::rng();
        let mut quiz = Vec::new();

        for subject in Subject::UNIT_SUBJECTS {
            let mut candidates = self.questions_at(subject, first).await?;
            candidates.extend(self.questions_at(subject, second).await?);
            candidates.shuffle(&mut rng);
            candidates.truncate(per_subject);
            quiz.extend(candidates);
        }

        if quiz.is_empty() {
            return Err(QuizServiceError::EmptyUnit { unit_id: unit.id() });
        }

        quiz.shuffle(&mut rng);
        Ok(quiz)
    }

    async fn questions_at(
        &self,
        subject: Subject,
        level: u32,
    ) -> Result<Vec<QuizQuestion>, QuizServiceError> {
        let questions = match subject {
            Subject::Phonetics => self
                .content
                .phonemes_at(level)
                .await?
                .into_iter()
                .map(QuizQuestion::Phoneme)
                .collect(),
            Subject::WordBuilding => self
                .content
                .words_at(level)
                .await?
                .into_iter()
                .map(QuizQuestion::Word)
                .collect(),
            Subject::SentenceReading => self
                .content
                .sentences_at(level)
                .await?
                .into_iter()
                .map(QuizQuestion::Sentence)
                .collect(),
            Subject::Punctuation => self
                .content
                .punctuation_at(level)
                .await?
                .into_iter()
                .map(QuizQuestion::Punctuation)
                .collect(),
            // Comprehension is read through its passage API, not as quiz
            // questions.
            Subject::ReadingComprehension => Vec::new(),
        };
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_core::model::{
        ContentId, MaxLevels, Phoneme, PunctuationQuestion, Sentence, TextId, UserProgress, Word,
        build_units,
    };
    use storage::repository::Storage;

    async fn storage_with_phonemes(levels: &[u32]) -> Storage {
        let storage = Storage::in_memory();
        for (i, level) in levels.iter().enumerate() {
            storage
                .content
                .upsert_phoneme(&Phoneme {
                    id: ContentId::new(i as u64 + 1),
                    symbol: format!("s{level}"),
                    sample_word: "ship".into(),
                    level: *level,
                })
                .await
                .unwrap();
        }
        storage
    }

    #[tokio::test]
    async fn practice_questions_use_requested_level() {
        let storage = storage_with_phonemes(&[1, 2, 2]).await;
        let service = QuizService::new(storage.content);

        let questions = service
            .practice_questions(Subject::Phonetics, 2)
            .await
            .unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions.iter().all(|q| q.subject() == Subject::Phonetics));
    }

    #[tokio::test]
    async fn empty_level_falls_back_to_nearest_lower() {
        let storage = storage_with_phonemes(&[1]).await;
        let service = QuizService::new(storage.content);

        // Level 3 has nothing; the level 1 content is served instead.
        let questions = service
            .practice_questions(Subject::Phonetics, 3)
            .await
            .unwrap();
        assert_eq!(questions.len(), 1);
    }

    #[tokio::test]
    async fn subject_without_content_reports_no_content() {
        let storage = Storage::in_memory();
        let service = QuizService::new(storage.content);

        let err = service
            .practice_questions(Subject::WordBuilding, 2)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuizServiceError::NoContent {
                subject: Subject::WordBuilding,
                level: 2
            }
        ));
    }

    #[tokio::test]
    async fn mixed_quiz_draws_from_unit_levels_only() {
        let storage = Storage::in_memory();
        for level in 1..=4 {
            let id = ContentId::new(u64::from(level));
            storage
                .content
                .upsert_word(&Word {
                    id,
                    text: format!("word{level}"),
                    level,
                })
                .await
                .unwrap();
            storage
                .content
                .upsert_sentence(&Sentence {
                    id,
                    text: format!("Sentence {level} here."),
                    target_word: "here".into(),
                    level,
                })
                .await
                .unwrap();
            storage
                .content
                .upsert_punctuation(&PunctuationQuestion {
                    id,
                    prompt: "Pick".into(),
                    options: vec!["?".into(), ".".into()],
                    answer: ".".into(),
                    level,
                })
                .await
                .unwrap();
            storage
                .content
                .upsert_phoneme(&Phoneme {
                    id,
                    symbol: "sh".into(),
                    sample_word: "ship".into(),
                    level,
                })
                .await
                .unwrap();
        }
        let service = QuizService::new(storage.content);

        let max_levels = Subject::UNIT_SUBJECTS
            .iter()
            .fold(MaxLevels::new(), |acc, s| acc.with(*s, 4));
        let units = build_units(&max_levels, &UserProgress::new());

        // Unit 2 covers levels 3 and 4.
        let quiz = service.mixed_quiz(&units[1], 2).await.unwrap();
        assert!(!quiz.is_empty());
        assert!(quiz.len() <= Subject::UNIT_SUBJECTS.len() * 2);
        for question in &quiz {
            let level = match question {
                QuizQuestion::Phoneme(p) => p.level,
                QuizQuestion::Word(w) => w.level,
                QuizQuestion::Sentence(s) => s.level,
                QuizQuestion::Punctuation(q) => q.level,
            };
            assert!(level == 3 || level == 4);
        }
    }

    #[tokio::test]
    async fn mixed_quiz_with_no_content_is_an_empty_unit() {
        let storage = Storage::in_memory();
        let service = QuizService::new(storage.content);

        let unit = build_units(
            &Subject::UNIT_SUBJECTS
                .iter()
                .fold(MaxLevels::new(), |acc, s| acc.with(*s, 2)),
            &UserProgress::new(),
        )
        .remove(0);

        let err = service.mixed_quiz(&unit, 2).await.unwrap_err();
        assert!(matches!(err, QuizServiceError::EmptyUnit { unit_id: 1 }));
    }

    #[tokio::test]
    async fn comprehension_passage_includes_its_questions() {
        let storage = Storage::in_memory();
        let text = reader_core::model::ComprehensionText {
            id: TextId::new(1),
            title: "The Garden".into(),
            body: "Mia waters the garden.".into(),
            level: 1,
        };
        storage
            .content
            .upsert_comprehension_text(&text)
            .await
            .unwrap();
        storage
            .content
            .upsert_comprehension_question(&reader_core::model::ComprehensionQuestion {
                id: ContentId::new(1),
                text_id: text.id,
                prompt: "Who waters the garden?".into(),
                options: vec!["Mia".into(), "Tom".into()],
                answer: "Mia".into(),
            })
            .await
            .unwrap();
        let service = QuizService::new(storage.content);

        // Level 4 is exhausted; fallback reaches the level 1 passage.
        let passage = service.comprehension_passage(4).await.unwrap();
        assert_eq!(passage.text.title, "The Garden");
        assert_eq!(passage.questions.len(), 1);
    }
}
