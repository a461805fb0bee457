mod content;
mod curriculum;
mod ids;
mod progress;
mod quiz;
mod subject;
mod unlock;

pub use content::{
    ComprehensionQuestion, ComprehensionText, Phoneme, PunctuationQuestion, Sentence, Word,
};
pub use curriculum::{Level, MaxLevels, Unit, build_units, subject_levels, unit_count};
pub use ids::{ContentId, TextId};
pub use progress::UserProgress;
pub use quiz::QuizQuestion;
pub use subject::Subject;
pub use unlock::{is_unlocked, unlock_flags};
