use async_trait::async_trait;
use reader_core::model::{
    ComprehensionQuestion, ComprehensionText, Phoneme, PunctuationQuestion, Sentence, Subject,
    TextId, UserProgress, Word,
};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read/seed access to the content tables.
///
/// Content is populated once at install time and immutable afterward; the
/// upserts exist for seeding and schema migration only.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Highest populated level number for a subject, 0 when the subject has
    /// no content yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the aggregate query fails.
    async fn highest_level(&self, subject: Subject) -> Result<u32, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn phonemes_at(&self, level: u32) -> Result<Vec<Phoneme>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn words_at(&self, level: u32) -> Result<Vec<Word>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn sentences_at(&self, level: u32) -> Result<Vec<Sentence>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn punctuation_at(&self, level: u32) -> Result<Vec<PunctuationQuestion>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn comprehension_texts_at(
        &self,
        level: u32,
    ) -> Result<Vec<ComprehensionText>, StorageError>;

    /// Questions attached to one comprehension passage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn comprehension_questions(
        &self,
        text_id: TextId,
    ) -> Result<Vec<ComprehensionQuestion>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn upsert_phoneme(&self, phoneme: &Phoneme) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn upsert_word(&self, word: &Word) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn upsert_sentence(&self, sentence: &Sentence) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn upsert_punctuation(
        &self,
        question: &PunctuationQuestion,
    ) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn upsert_comprehension_text(
        &self,
        text: &ComprehensionText,
    ) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn upsert_comprehension_question(
        &self,
        question: &ComprehensionQuestion,
    ) -> Result<(), StorageError>;
}

/// Access to the singleton progress record.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Read the progress record. `None` means no record has been written
    /// yet; callers treat that as the canonical empty default.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn get_progress(&self) -> Result<Option<UserProgress>, StorageError>;

    /// Replace the whole progress record atomically.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn upsert_progress(&self, progress: &UserProgress) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY BACKEND ─────────────────────────────────────────────────────────
//

#[derive(Default)]
struct InMemoryState {
    phonemes: Vec<Phoneme>,
    words: Vec<Word>,
    sentences: Vec<Sentence>,
    punctuation: Vec<PunctuationQuestion>,
    texts: Vec<ComprehensionText>,
    questions: Vec<ComprehensionQuestion>,
    progress: Option<UserProgress>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, InMemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

fn upsert_by_key<T: Clone, K: PartialEq>(rows: &mut Vec<T>, row: &T, key: impl Fn(&T) -> K) {
    if let Some(existing) = rows.iter_mut().find(|r| key(r) == key(row)) {
        *existing = row.clone();
    } else {
        rows.push(row.clone());
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn highest_level(&self, subject: Subject) -> Result<u32, StorageError> {
        let state = self.lock()?;
        let max = match subject {
            Subject::Phonetics => state.phonemes.iter().map(|r| r.level).max(),
            Subject::WordBuilding => state.words.iter().map(|r| r.level).max(),
            Subject::SentenceReading => state.sentences.iter().map(|r| r.level).max(),
            Subject::Punctuation => state.punctuation.iter().map(|r| r.level).max(),
            Subject::ReadingComprehension => state.texts.iter().map(|r| r.level).max(),
        };
        Ok(max.unwrap_or(0))
    }

    async fn phonemes_at(&self, level: u32) -> Result<Vec<Phoneme>, StorageError> {
        let state = self.lock()?;
        Ok(state
            .phonemes
            .iter()
            .filter(|r| r.level == level)
            .cloned()
            .collect())
    }

    async fn words_at(&self, level: u32) -> Result<Vec<Word>, StorageError> {
        let state = self.lock()?;
        Ok(state
            .words
            .iter()
            .filter(|r| r.level == level)
            .cloned()
            .collect())
    }

    async fn sentences_at(&self, level: u32) -> Result<Vec<Sentence>, StorageError> {
        let state = self.lock()?;
        Ok(state
            .sentences
            .iter()
            .filter(|r| r.level == level)
            .cloned()
            .collect())
    }

    async fn punctuation_at(&self, level: u32) -> Result<Vec<PunctuationQuestion>, StorageError> {
        let state = self.lock()?;
        Ok(state
            .punctuation
            .iter()
            .filter(|r| r.level == level)
            .cloned()
            .collect())
    }

    async fn comprehension_texts_at(
        &self,
        level: u32,
    ) -> Result<Vec<ComprehensionText>, StorageError> {
        let state = self.lock()?;
        Ok(state
            .texts
            .iter()
            .filter(|r| r.level == level)
            .cloned()
            .collect())
    }

    async fn comprehension_questions(
        &self,
        text_id: TextId,
    ) -> Result<Vec<ComprehensionQuestion>, StorageError> {
        let state = self.lock()?;
        Ok(state
            .questions
            .iter()
            .filter(|r| r.text_id == text_id)
            .cloned()
            .collect())
    }

    async fn upsert_phoneme(&self, phoneme: &Phoneme) -> Result<(), StorageError> {
        upsert_by_key(&mut self.lock()?.phonemes, phoneme, |r| r.id);
        Ok(())
    }

    async fn upsert_word(&self, word: &Word) -> Result<(), StorageError> {
        upsert_by_key(&mut self.lock()?.words, word, |r| r.id);
        Ok(())
    }

    async fn upsert_sentence(&self, sentence: &Sentence) -> Result<(), StorageError> {
        upsert_by_key(&mut self.lock()?.sentences, sentence, |r| r.id);
        Ok(())
    }

    async fn upsert_punctuation(
        &self,
        question: &PunctuationQuestion,
    ) -> Result<(), StorageError> {
        upsert_by_key(&mut self.lock()?.punctuation, question, |r| r.id);
        Ok(())
    }

    async fn upsert_comprehension_text(
        &self,
        text: &ComprehensionText,
    ) -> Result<(), StorageError> {
        upsert_by_key(&mut self.lock()?.texts, text, |r| r.id);
        Ok(())
    }

    async fn upsert_comprehension_question(
        &self,
        question: &ComprehensionQuestion,
    ) -> Result<(), StorageError> {
        upsert_by_key(&mut self.lock()?.questions, question, |r| r.id);
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(&self) -> Result<Option<UserProgress>, StorageError> {
        Ok(self.lock()?.progress.clone())
    }

    async fn upsert_progress(&self, progress: &UserProgress) -> Result<(), StorageError> {
        self.lock()?.progress = Some(progress.clone());
        Ok(())
    }
}

/// Aggregates the content and progress repositories behind trait objects
/// for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub content: Arc<dyn ContentRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let content: Arc<dyn ContentRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self { content, progress }
    }
}
