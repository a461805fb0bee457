#![forbid(unsafe_code)]

pub mod app_services;
pub mod curriculum_feed;
pub mod curriculum_service;
pub mod error;
pub mod progress_service;
pub mod quiz_service;
pub mod quiz_session;
pub mod reminder_service;
pub mod remote_content_service;

pub use reader_core::Clock;

pub use app_services::AppServices;
pub use curriculum_feed::CurriculumFeed;
pub use curriculum_service::CurriculumService;
pub use error::{
    CurriculumError, ProgressServiceError, QuizError, QuizServiceError, RemoteContentError,
};
pub use progress_service::ProgressService;
pub use quiz_service::{ComprehensionPassage, QuizService};
pub use quiz_session::{QuizAdvance, QuizSession, QuizSummary};
pub use reminder_service::{ReminderSchedule, ReminderService};
pub use remote_content_service::{RemoteCatalog, RemoteContentService};
