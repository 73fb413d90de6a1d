pub mod answer_service;
pub mod auth_service;
pub mod catalog_service;
pub mod error_book_service;
pub mod evaluator;
pub mod exercise_service;
pub mod progress_aggregator;
pub mod progress_service;
pub mod task_service;
pub mod upload_service;
pub mod user_service;

pub use answer_service::AnswerService;
pub use auth_service::AuthService;
pub use catalog_service::CatalogService;
pub use error_book_service::ErrorBookService;
pub use evaluator::AnswerEvaluator;
pub use exercise_service::ExerciseService;
pub use progress_aggregator::ProgressAggregator;
pub use progress_service::ProgressService;
pub use task_service::TaskService;
pub use upload_service::UploadService;
pub use user_service::UserService;
