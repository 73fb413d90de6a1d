use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::models::domain::{ExerciseType, TaskStatus};

static USERNAME_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[a-zA-Z0-9_]+$").expect("USERNAME_REGEX is a valid regex pattern")
});

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 50),
        regex(
            path = *USERNAME_REGEX,
            message = "Username must be alphanumeric with underscores"
        )
    )]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub display_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 50))]
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStudentRequest {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 50))]
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubjectRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUnitRequest {
    #[validate(length(min = 1))]
    pub subject_id: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUnitRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1))]
    pub unit_id: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub content: Option<String>,
    #[validate(url)]
    pub media_url: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub content: Option<String>,
    #[validate(url)]
    pub media_url: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExerciseRequest {
    #[validate(length(min = 1))]
    pub unit_id: String,
    pub course_id: Option<String>,
    pub exercise_type: ExerciseType,
    #[validate(length(min = 1, max = 4000))]
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: Value,
    pub explanation: Option<String>,
    #[serde(default)]
    pub knowledge_points: Vec<String>,
    #[validate(range(min = 0, max = 1000))]
    pub points: Option<i32>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateExerciseRequest {
    pub exercise_type: Option<ExerciseType>,
    #[validate(length(min = 1, max = 4000))]
    pub prompt: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<Value>,
    pub explanation: Option<String>,
    pub knowledge_points: Option<Vec<String>>,
    #[validate(range(min = 0, max = 1000))]
    pub points: Option<i32>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    pub answer: Value,
    #[validate(range(min = 0))]
    pub response_time_ms: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1))]
    pub student_id: String,
    #[validate(length(min = 1))]
    pub unit_id: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskQuery {
    pub student_id: Option<String>,
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBookQuery {
    pub student_id: Option<String>,
    pub include_mastered: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentScopeQuery {
    pub student_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AnswerHistoryQuery {
    pub student_id: Option<String>,
    pub unit_id: Option<String>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl AnswerHistoryQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            offset: self.offset,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}
