use reader_core::model::{
    ComprehensionQuestion, ComprehensionText, ContentId, Phoneme, PunctuationQuestion, Sentence,
    Subject, TextId, Word,
};
use sqlx::Row;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn content_id_from_i64(v: i64) -> Result<ContentId, StorageError> {
    Ok(ContentId::new(i64_to_u64("content_id", v)?))
}

pub(crate) fn text_id_from_i64(v: i64) -> Result<TextId, StorageError> {
    Ok(TextId::new(i64_to_u64("text_id", v)?))
}

pub(crate) fn content_id_to_i64(id: ContentId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("content_id overflow".into()))
}

pub(crate) fn text_id_to_i64(id: TextId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("text_id overflow".into()))
}

pub(crate) fn level_from_i64(v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid level: {v}")))
}

pub(crate) fn subject_from_key(key: &str) -> Result<Subject, StorageError> {
    Subject::from_key(key)
        .ok_or_else(|| StorageError::Serialization(format!("invalid subject: {key}")))
}

/// Option lists are stored as a JSON array in a TEXT column.
pub(crate) fn options_to_json(options: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(options).map_err(ser)
}

pub(crate) fn options_from_json(raw: &str) -> Result<Vec<String>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn map_phoneme_row(row: &sqlx::sqlite::SqliteRow) -> Result<Phoneme, StorageError> {
    Ok(Phoneme {
        id: content_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        symbol: row.try_get("symbol").map_err(ser)?,
        sample_word: row.try_get("sample_word").map_err(ser)?,
        level: level_from_i64(row.try_get::<i64, _>("level").map_err(ser)?)?,
    })
}

pub(crate) fn map_word_row(row: &sqlx::sqlite::SqliteRow) -> Result<Word, StorageError> {
    Ok(Word {
        id: content_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        text: row.try_get("text").map_err(ser)?,
        level: level_from_i64(row.try_get::<i64, _>("level").map_err(ser)?)?,
    })
}

pub(crate) fn map_sentence_row(row: &sqlx::sqlite::SqliteRow) -> Result<Sentence, StorageError> {
    Ok(Sentence {
        id: content_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        text: row.try_get("text").map_err(ser)?,
        target_word: row.try_get("target_word").map_err(ser)?,
        level: level_from_i64(row.try_get::<i64, _>("level").map_err(ser)?)?,
    })
}

pub(crate) fn map_punctuation_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<PunctuationQuestion, StorageError> {
    Ok(PunctuationQuestion {
        id: content_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        prompt: row.try_get("prompt").map_err(ser)?,
        options: options_from_json(row.try_get::<String, _>("options").map_err(ser)?.as_str())?,
        answer: row.try_get("answer").map_err(ser)?,
        level: level_from_i64(row.try_get::<i64, _>("level").map_err(ser)?)?,
    })
}

pub(crate) fn map_comprehension_text_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<ComprehensionText, StorageError> {
    Ok(ComprehensionText {
        id: text_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        title: row.try_get("title").map_err(ser)?,
        body: row.try_get("body").map_err(ser)?,
        level: level_from_i64(row.try_get::<i64, _>("level").map_err(ser)?)?,
    })
}

pub(crate) fn map_comprehension_question_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<ComprehensionQuestion, StorageError> {
    Ok(ComprehensionQuestion {
        id: content_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        text_id: text_id_from_i64(row.try_get::<i64, _>("text_id").map_err(ser)?)?,
        prompt: row.try_get("prompt").map_err(ser)?,
        options: options_from_json(row.try_get::<String, _>("options").map_err(ser)?.as_str())?,
        answer: row.try_get("answer").map_err(ser)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_json_round_trips() {
        let options = vec!["?".to_string(), ".".to_string()];
        let raw = options_to_json(&options).unwrap();
        assert_eq!(options_from_json(&raw).unwrap(), options);
    }

    #[test]
    fn subject_key_rejects_unknown() {
        assert!(subject_from_key("phonetics").is_ok());
        assert!(subject_from_key("geometry").is_err());
    }
}
