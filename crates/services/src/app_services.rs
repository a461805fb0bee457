use std::sync::Arc;

use storage::repository::Storage;

use crate::curriculum_service::CurriculumService;
use crate::progress_service::ProgressService;
use crate::quiz_service::QuizService;
use crate::remote_content_service::RemoteContentService;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    curriculum: Arc<CurriculumService>,
    progress: Arc<ProgressService>,
    quizzes: Arc<QuizService>,
    remote_content: Arc<RemoteContentService>,
}

impl AppServices {
    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self {
            curriculum: Arc::new(CurriculumService::new(Arc::clone(&storage.content))),
            progress: Arc::new(ProgressService::new(Arc::clone(&storage.progress))),
            quizzes: Arc::new(QuizService::new(Arc::clone(&storage.content))),
            remote_content: Arc::new(RemoteContentService::from_env()),
        }
    }

    #[must_use]
    pub fn curriculum(&self) -> Arc<CurriculumService> {
        Arc::clone(&self.curriculum)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    #[must_use]
    pub fn remote_content(&self) -> Arc<RemoteContentService> {
        Arc::clone(&self.remote_content)
    }
}
