use std::sync::Arc;

use reader_core::model::{
    Level, MaxLevels, Subject, Unit, UserProgress, build_units, subject_levels,
};
use storage::repository::ContentRepository;

use crate::error::CurriculumError;

/// Derives the curriculum from content population and progress.
///
/// Owns no state of its own; every call recomputes from the stores.
pub struct CurriculumService {
    content: Arc<dyn ContentRepository>,
}

impl CurriculumService {
    #[must_use]
    pub fn new(content: Arc<dyn ContentRepository>) -> Self {
        Self { content }
    }

    /// Maximum populated level per subject, straight from the content
    /// tables.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` if an aggregate query fails.
    pub async fn max_levels(&self) -> Result<MaxLevels, CurriculumError> {
        let mut max_levels = MaxLevels::new();
        for subject in Subject::ALL {
            max_levels.set(subject, self.content.highest_level(subject).await?);
        }
        Ok(max_levels)
    }

    /// Ordered unit list for the aggregate Units view, gated by the subject
    /// with the least content.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` if an aggregate query fails.
    pub async fn units(&self, progress: &UserProgress) -> Result<Vec<Unit>, CurriculumError> {
        let max_levels = self.max_levels().await?;
        Ok(build_units(&max_levels, progress))
    }

    /// Level list for one subject's picker; not gated by other subjects.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` if the aggregate query fails.
    pub async fn levels_for(
        &self,
        subject: Subject,
        progress: &UserProgress,
    ) -> Result<Vec<Level>, CurriculumError> {
        let max_level = self.content.highest_level(subject).await?;
        Ok(subject_levels(subject, max_level, progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_core::model::{ContentId, Phoneme, PunctuationQuestion, Sentence, Word};
    use storage::repository::Storage;

    async fn seeded_storage(levels: u32) -> Storage {
        let storage = Storage::in_memory();
        for level in 1..=levels {
            let id = ContentId::new(u64::from(level));
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
            storage
                .content
                .upsert_word(&Word {
                    id,
                    text: "sun".into(),
                    level,
                })
                .await
                .unwrap();
            storage
                .content
                .upsert_sentence(&Sentence {
                    id,
                    text: "The dog barks.".into(),
                    target_word: "dog".into(),
                    level,
                })
                .await
                .unwrap();
            storage
                .content
                .upsert_punctuation(&PunctuationQuestion {
                    id,
                    prompt: "Pick the ending mark".into(),
                    options: vec!["?".into(), ".".into()],
                    answer: ".".into(),
                    level,
                })
                .await
                .unwrap();
        }
        storage
    }

    #[tokio::test]
    async fn units_reflect_seeded_content() {
        let storage = seeded_storage(2).await;
        let service = CurriculumService::new(storage.content);

        let units = service.units(&UserProgress::new()).await.unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].levels().len(), 8);
    }

    #[tokio::test]
    async fn units_are_gated_but_pickers_are_not() {
        let storage = seeded_storage(4).await;
        let service = CurriculumService::new(Arc::clone(&storage.content));

        let units = service.units(&UserProgress::new()).await.unwrap();
        assert_eq!(units.len(), 2);

        // Comprehension has no content, yet its picker is simply empty
        // rather than blocking the other subjects.
        let levels = service
            .levels_for(Subject::ReadingComprehension, &UserProgress::new())
            .await
            .unwrap();
        assert!(levels.is_empty());

        let phonetics = service
            .levels_for(Subject::Phonetics, &UserProgress::new())
            .await
            .unwrap();
        assert_eq!(phonetics.len(), 4);
    }

    #[tokio::test]
    async fn completion_shows_up_in_derived_levels() {
        let storage = seeded_storage(2).await;
        let service = CurriculumService::new(storage.content);

        let mut progress = UserProgress::new();
        progress.mark_completed(Subject::Phonetics, 1);

        let levels = service
            .levels_for(Subject::Phonetics, &progress)
            .await
            .unwrap();
        assert!(levels[0].is_completed);
        assert!(!levels[1].is_completed);
    }
}
