use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::Repositories,
    services::{
        AnswerService, AuthService, CatalogService, ErrorBookService, ExerciseService,
        ProgressService, TaskService, UploadService, UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub catalog_service: Arc<CatalogService>,
    pub exercise_service: Arc<ExerciseService>,
    pub answer_service: Arc<AnswerService>,
    pub progress_service: Arc<ProgressService>,
    pub error_book_service: Arc<ErrorBookService>,
    pub task_service: Arc<TaskService>,
    pub upload_service: Arc<UploadService>,
    pub jwt_service: JwtService,
    pub config: Arc<Config>,
    /// `None` when running over in-memory repositories.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;
        let repositories = Repositories::mongo(&db).await?;

        Ok(Self::with_repositories(config, repositories, Some(db)))
    }

    pub fn with_repositories(config: Config, repos: Repositories, db: Option<Database>) -> Self {
        let jwt_service = JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
            config.refresh_expiration_hours,
        );

        let progress_service = Arc::new(ProgressService::new(
            repos.exercises.clone(),
            repos.courses.clone(),
            repos.answer_records.clone(),
            repos.progress.clone(),
            repos.users.clone(),
            config.mastery_window,
        ));
        let task_service = Arc::new(TaskService::new(
            repos.tasks.clone(),
            repos.users.clone(),
            repos.units.clone(),
        ));
        let answer_service = Arc::new(AnswerService::new(
            repos.exercises.clone(),
            repos.users.clone(),
            repos.answer_records.clone(),
            repos.error_book.clone(),
            progress_service.clone(),
            task_service.clone(),
        ));

        Self {
            auth_service: Arc::new(AuthService::new(
                repos.users.clone(),
                repos.refresh_tokens.clone(),
                jwt_service.clone(),
            )),
            user_service: Arc::new(UserService::new(
                repos.users.clone(),
                repos.refresh_tokens.clone(),
            )),
            catalog_service: Arc::new(CatalogService::new(
                repos.subjects.clone(),
                repos.units.clone(),
                repos.courses.clone(),
                repos.exercises.clone(),
            )),
            exercise_service: Arc::new(ExerciseService::new(
                repos.exercises.clone(),
                repos.units.clone(),
                repos.answer_records.clone(),
            )),
            answer_service,
            progress_service,
            error_book_service: Arc::new(ErrorBookService::new(
                repos.error_book.clone(),
                repos.exercises.clone(),
            )),
            task_service,
            upload_service: Arc::new(UploadService::new(
                &config.upload_dir,
                &config.public_base_url,
                config.max_upload_bytes,
            )),
            jwt_service,
            config: Arc::new(config),
            db,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<AppState>();
    }
}
