//! Shared error types for the services crate.

use thiserror::Error;

use reader_core::model::Subject;
use storage::repository::StorageError;

/// Errors emitted by the quiz session state machine.
///
/// All of these are caller mistakes surfaced synchronously; none of them
/// terminate the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("cannot start a session with no questions")]
    Empty,

    #[error("current question already has a judged answer")]
    AlreadyAnswered,

    #[error("no answer submitted for the current question")]
    NotAnswered,

    #[error("session already completed")]
    Completed,
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CurriculumService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CurriculumError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("no content for {subject} at level {level} or below")]
    NoContent { subject: Subject, level: u32 },

    #[error("no content available for unit {unit_id}")]
    EmptyUnit { unit_id: u32 },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `RemoteContentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteContentError {
    #[error("remote content request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
