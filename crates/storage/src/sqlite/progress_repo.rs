use reader_core::model::UserProgress;
use sqlx::Row;

use super::{SqliteRepository, mapping};
use crate::repository::{ProgressRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(&self) -> Result<Option<UserProgress>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT subject, level
            FROM completed_levels
            ORDER BY subject ASC, level ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        if rows.is_empty() {
            return Ok(None);
        }

        let mut pairs = Vec::with_capacity(rows.len());
        for row in &rows {
            let subject = mapping::subject_from_key(
                row.try_get::<String, _>("subject")
                    .map_err(|e| StorageError::Serialization(e.to_string()))?
                    .as_str(),
            )?;
            let level =
                mapping::level_from_i64(row.try_get::<i64, _>("level").map_err(conn)?)?;
            pairs.push((subject, level));
        }

        Ok(Some(UserProgress::from_pairs(pairs)))
    }

    async fn upsert_progress(&self, progress: &UserProgress) -> Result<(), StorageError> {
        // Replace the singleton record wholesale inside one transaction so a
        // reader never observes a partially written state.
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query("DELETE FROM completed_levels")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (subject, level) in progress.pairs() {
            sqlx::query(
                r"
                INSERT INTO completed_levels (subject, level)
                VALUES (?1, ?2)
                ON CONFLICT(subject, level) DO NOTHING
                ",
            )
            .bind(subject.as_str())
            .bind(i64::from(level))
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
