use std::sync::Arc;

use reader_core::model::{Subject, UserProgress};
use storage::repository::ProgressRepository;
use tokio::sync::{Mutex, watch};

use crate::error::ProgressServiceError;

/// Applies the mark-level-complete rule against the singleton progress
/// record and streams accepted states to subscribers.
pub struct ProgressService {
    repo: Arc<dyn ProgressRepository>,
    // Serializes the read-modify-write against the singleton record so two
    // overlapping completions cannot overwrite each other's update.
    write_lock: Mutex<()>,
    tx: watch::Sender<Option<UserProgress>>,
}

impl ProgressService {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            repo,
            write_lock: Mutex::new(()),
            tx,
        }
    }

    /// Current progress. An absent stored record is the canonical empty
    /// default, never an error.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if the storage read fails.
    pub async fn load(&self) -> Result<UserProgress, ProgressServiceError> {
        Ok(self.repo.get_progress().await?.unwrap_or_default())
    }

    /// Subscribe to progress updates.
    ///
    /// The stream carries `None` until [`ProgressService::refresh`] or the
    /// first completed level publishes a value; last value wins.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<UserProgress>> {
        self.tx.subscribe()
    }

    /// Read the stored state and publish it to subscribers. Called once at
    /// startup so consumers leave their pending state.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if the storage read fails.
    pub async fn refresh(&self) -> Result<UserProgress, ProgressServiceError> {
        let progress = self.load().await?;
        self.tx.send_replace(Some(progress.clone()));
        Ok(progress)
    }

    /// Idempotently record that `level` has been completed for `subject`.
    ///
    /// Read-copy-write against the whole record; re-applying the same
    /// completion leaves the stored state untouched. Out-of-order
    /// completion is deliberately permitted, the unlock policy handles
    /// ordering at the presentation layer.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if the storage read or write fails.
    pub async fn mark_level_complete(
        &self,
        subject: Subject,
        level: u32,
    ) -> Result<UserProgress, ProgressServiceError> {
        let _guard = self.write_lock.lock().await;

        let mut progress = self.load().await?;
        if progress.mark_completed(subject, level) {
            self.repo.upsert_progress(&progress).await?;
        }
        self.tx.send_replace(Some(progress.clone()));
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::repository::{Storage, StorageError};

    fn service() -> ProgressService {
        ProgressService::new(Storage::in_memory().progress)
    }

    struct FailingRepo;

    #[async_trait]
    impl ProgressRepository for FailingRepo {
        async fn get_progress(&self) -> Result<Option<UserProgress>, StorageError> {
            Err(StorageError::Connection("down".into()))
        }

        async fn upsert_progress(&self, _progress: &UserProgress) -> Result<(), StorageError> {
            Err(StorageError::Connection("down".into()))
        }
    }

    #[tokio::test]
    async fn absent_record_loads_as_empty_default() {
        let service = service();
        let progress = service.load().await.unwrap();
        assert!(progress.is_empty());
    }

    #[tokio::test]
    async fn marking_twice_stores_the_same_state() {
        let service = service();

        let first = service
            .mark_level_complete(Subject::Phonetics, 2)
            .await
            .unwrap();
        let second = service
            .mark_level_complete(Subject::Phonetics, 2)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(
            service.load().await.unwrap().completed_for(Subject::Phonetics),
            vec![2]
        );
    }

    #[tokio::test]
    async fn concurrent_marks_for_different_subjects_both_land() {
        let service = Arc::new(service());

        let a = Arc::clone(&service);
        let b = Arc::clone(&service);
        let (ra, rb) = tokio::join!(
            a.mark_level_complete(Subject::Phonetics, 1),
            b.mark_level_complete(Subject::Punctuation, 1),
        );
        ra.unwrap();
        rb.unwrap();

        let progress = service.load().await.unwrap();
        assert!(progress.is_completed(Subject::Phonetics, 1));
        assert!(progress.is_completed(Subject::Punctuation, 1));
    }

    #[tokio::test]
    async fn storage_failures_surface_as_service_errors() {
        let service = ProgressService::new(Arc::new(FailingRepo));
        let err = service
            .mark_level_complete(Subject::Phonetics, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressServiceError::Storage(_)));
    }

    #[tokio::test]
    async fn subscribers_see_pending_then_updates() {
        let service = service();
        let mut rx = service.subscribe();
        assert!(rx.borrow().is_none());

        service
            .mark_level_complete(Subject::WordBuilding, 1)
            .await
            .unwrap();
        rx.changed().await.unwrap();

        let latest = rx.borrow().clone().expect("published progress");
        assert!(latest.is_completed(Subject::WordBuilding, 1));
    }
}
