pub mod answer_record;
pub mod course;
pub mod error_book;
pub mod exercise;
pub mod refresh_token;
pub mod study_task;
pub mod subject;
pub mod timestamp;
pub mod unit;
pub mod unit_progress;
pub mod user;

pub use answer_record::{AnswerRecord, Verdict};
pub use course::Course;
pub use error_book::ErrorBookEntry;
pub use exercise::{Exercise, ExerciseType, DEFAULT_EXERCISE_POINTS};
pub use refresh_token::{hash_token, RefreshToken};
pub use study_task::{StudyTask, TaskStatus};
pub use subject::Subject;
pub use unit::Unit;
pub use unit_progress::{UnitProgress, UnitStatus};
pub use user::{User, UserRole};
