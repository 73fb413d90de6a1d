use std::sync::Arc;

use crate::{db::Database, errors::AppResult};

pub mod answer_record_repository;
pub mod course_repository;
pub mod error_book_repository;
pub mod exercise_repository;
pub mod refresh_token_repository;
pub mod study_task_repository;
pub mod subject_repository;
pub mod unit_progress_repository;
pub mod unit_repository;
pub mod user_repository;

pub use answer_record_repository::{AnswerRecordRepository, MongoAnswerRecordRepository};
pub use course_repository::{CourseRepository, MongoCourseRepository};
pub use error_book_repository::{ErrorBookRepository, MongoErrorBookRepository};
pub use exercise_repository::{ExerciseRepository, MongoExerciseRepository};
pub use refresh_token_repository::{MongoRefreshTokenRepository, RefreshTokenRepository};
pub use study_task_repository::{MongoStudyTaskRepository, StudyTaskRepository};
pub use subject_repository::{MongoSubjectRepository, SubjectRepository};
pub use unit_progress_repository::{MongoUnitProgressRepository, UnitProgressRepository};
pub use unit_repository::{MongoUnitRepository, UnitRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

/// Every collection the services read or write, behind its repository trait.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
    pub subjects: Arc<dyn SubjectRepository>,
    pub units: Arc<dyn UnitRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub exercises: Arc<dyn ExerciseRepository>,
    pub answer_records: Arc<dyn AnswerRecordRepository>,
    pub progress: Arc<dyn UnitProgressRepository>,
    pub error_book: Arc<dyn ErrorBookRepository>,
    pub tasks: Arc<dyn StudyTaskRepository>,
}

impl Repositories {
    pub async fn mongo(db: &Database) -> AppResult<Self> {
        let users = MongoUserRepository::new(db);
        users.ensure_indexes().await?;
        let refresh_tokens = MongoRefreshTokenRepository::new(db);
        refresh_tokens.ensure_indexes().await?;
        let subjects = MongoSubjectRepository::new(db);
        subjects.ensure_indexes().await?;
        let units = MongoUnitRepository::new(db);
        units.ensure_indexes().await?;
        let courses = MongoCourseRepository::new(db);
        courses.ensure_indexes().await?;
        let exercises = MongoExerciseRepository::new(db);
        exercises.ensure_indexes().await?;
        let answer_records = MongoAnswerRecordRepository::new(db);
        answer_records.ensure_indexes().await?;
        let progress = MongoUnitProgressRepository::new(db);
        progress.ensure_indexes().await?;
        let error_book = MongoErrorBookRepository::new(db);
        error_book.ensure_indexes().await?;
        let tasks = MongoStudyTaskRepository::new(db);
        tasks.ensure_indexes().await?;

        Ok(Self {
            users: Arc::new(users),
            refresh_tokens: Arc::new(refresh_tokens),
            subjects: Arc::new(subjects),
            units: Arc::new(units),
            courses: Arc::new(courses),
            exercises: Arc::new(exercises),
            answer_records: Arc::new(answer_records),
            progress: Arc::new(progress),
            error_book: Arc::new(error_book),
            tasks: Arc::new(tasks),
        })
    }
}
