use reader_core::model::{
    ComprehensionQuestion, ComprehensionText, Phoneme, PunctuationQuestion, Sentence, Subject,
    TextId, Word,
};

use super::{SqliteRepository, mapping};
use crate::repository::{ContentRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

/// Table holding each subject's content rows. Reading comprehension counts
/// its passages; its questions hang off a passage and carry no level.
fn level_table(subject: Subject) -> &'static str {
    match subject {
        Subject::Phonetics => "phonemes",
        Subject::WordBuilding => "words",
        Subject::SentenceReading => "sentences",
        Subject::Punctuation => "punctuation_questions",
        Subject::ReadingComprehension => "comprehension_texts",
    }
}

#[async_trait::async_trait]
impl ContentRepository for SqliteRepository {
    async fn highest_level(&self, subject: Subject) -> Result<u32, StorageError> {
        let sql = format!(
            "SELECT COALESCE(MAX(level), 0) AS max_level FROM {}",
            level_table(subject)
        );
        let max: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(conn)?;
        mapping::level_from_i64(max.max(0))
    }

    async fn phonemes_at(&self, level: u32) -> Result<Vec<Phoneme>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, symbol, sample_word, level
            FROM phonemes
            WHERE level = ?1
            ORDER BY id ASC
            ",
        )
        .bind(i64::from(level))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(mapping::map_phoneme_row).collect()
    }

    async fn words_at(&self, level: u32) -> Result<Vec<Word>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, text, level
            FROM words
            WHERE level = ?1
            ORDER BY id ASC
            ",
        )
        .bind(i64::from(level))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(mapping::map_word_row).collect()
    }

    async fn sentences_at(&self, level: u32) -> Result<Vec<Sentence>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, text, target_word, level
            FROM sentences
            WHERE level = ?1
            ORDER BY id ASC
            ",
        )
        .bind(i64::from(level))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(mapping::map_sentence_row).collect()
    }

    async fn punctuation_at(&self, level: u32) -> Result<Vec<PunctuationQuestion>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, prompt, options, answer, level
            FROM punctuation_questions
            WHERE level = ?1
            ORDER BY id ASC
            ",
        )
        .bind(i64::from(level))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(mapping::map_punctuation_row).collect()
    }

    async fn comprehension_texts_at(
        &self,
        level: u32,
    ) -> Result<Vec<ComprehensionText>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, body, level
            FROM comprehension_texts
            WHERE level = ?1
            ORDER BY id ASC
            ",
        )
        .bind(i64::from(level))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(mapping::map_comprehension_text_row).collect()
    }

    async fn comprehension_questions(
        &self,
        text_id: TextId,
    ) -> Result<Vec<ComprehensionQuestion>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, text_id, prompt, options, answer
            FROM comprehension_questions
            WHERE text_id = ?1
            ORDER BY id ASC
            ",
        )
        .bind(mapping::text_id_to_i64(text_id)?)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter()
            .map(mapping::map_comprehension_question_row)
            .collect()
    }

    async fn upsert_phoneme(&self, phoneme: &Phoneme) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO phonemes (id, symbol, sample_word, level)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                symbol = excluded.symbol,
                sample_word = excluded.sample_word,
                level = excluded.level
            ",
        )
        .bind(mapping::content_id_to_i64(phoneme.id)?)
        .bind(phoneme.symbol.as_str())
        .bind(phoneme.sample_word.as_str())
        .bind(i64::from(phoneme.level))
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn upsert_word(&self, word: &Word) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO words (id, text, level)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                text = excluded.text,
                level = excluded.level
            ",
        )
        .bind(mapping::content_id_to_i64(word.id)?)
        .bind(word.text.as_str())
        .bind(i64::from(word.level))
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn upsert_sentence(&self, sentence: &Sentence) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO sentences (id, text, target_word, level)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                text = excluded.text,
                target_word = excluded.target_word,
                level = excluded.level
            ",
        )
        .bind(mapping::content_id_to_i64(sentence.id)?)
        .bind(sentence.text.as_str())
        .bind(sentence.target_word.as_str())
        .bind(i64::from(sentence.level))
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn upsert_punctuation(
        &self,
        question: &PunctuationQuestion,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO punctuation_questions (id, prompt, options, answer, level)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                prompt = excluded.prompt,
                options = excluded.options,
                answer = excluded.answer,
                level = excluded.level
            ",
        )
        .bind(mapping::content_id_to_i64(question.id)?)
        .bind(question.prompt.as_str())
        .bind(mapping::options_to_json(&question.options)?)
        .bind(question.answer.as_str())
        .bind(i64::from(question.level))
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn upsert_comprehension_text(
        &self,
        text: &ComprehensionText,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO comprehension_texts (id, title, body, level)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                body = excluded.body,
                level = excluded.level
            ",
        )
        .bind(mapping::text_id_to_i64(text.id)?)
        .bind(text.title.as_str())
        .bind(text.body.as_str())
        .bind(i64::from(text.level))
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn upsert_comprehension_question(
        &self,
        question: &ComprehensionQuestion,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO comprehension_questions (id, text_id, prompt, options, answer)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                text_id = excluded.text_id,
                prompt = excluded.prompt,
                options = excluded.options,
                answer = excluded.answer
            ",
        )
        .bind(mapping::content_id_to_i64(question.id)?)
        .bind(mapping::text_id_to_i64(question.text_id)?)
        .bind(question.prompt.as_str())
        .bind(mapping::options_to_json(&question.options)?)
        .bind(question.answer.as_str())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }
}
