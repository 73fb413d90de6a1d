use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{
    ErrorBookEntry, Exercise, ExerciseType, UnitProgress, User, UserRole, Verdict,
};

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    pub points: i64,
    #[graphql(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            email: user.email,
            role: user.role,
            grade: user.grade,
            points: user.points,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

/// An exercise as shown to a student: everything except the answer key.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct ExerciseView {
    pub id: String,
    pub unit_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    pub exercise_type: ExerciseType,
    pub prompt: String,
    pub options: Vec<String>,
    pub knowledge_points: Vec<String>,
    pub points: i32,
    pub order: i32,
}

impl From<Exercise> for ExerciseView {
    fn from(exercise: Exercise) -> Self {
        ExerciseView {
            id: exercise.id,
            unit_id: exercise.unit_id,
            course_id: exercise.course_id,
            exercise_type: exercise.exercise_type,
            prompt: exercise.prompt,
            options: exercise.options,
            knowledge_points: exercise.knowledge_points,
            points: exercise.points,
            order: exercise.order,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBookItem {
    #[serde(flatten)]
    pub entry: ErrorBookEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise: Option<ExerciseView>,
}

/// Immediate feedback returned for one submission.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct SubmissionOutcome {
    pub record_id: String,
    pub exercise_id: String,
    pub verdict: Verdict,
    pub correct: bool,
    pub attempt_number: i32,
    pub points_awarded: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub progress: UnitProgress,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub file_name: String,
    pub size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_dto_hides_password_hash() {
        let user = User::new("ming", "Ming", "$argon2id$secret".to_string(), UserRole::Student);

        let dto: UserDto = user.into();
        let json = serde_json::to_string(&dto).unwrap();

        assert!(!json.contains("argon2"));
        assert!(json.contains("\"username\":\"ming\""));
    }

    #[test]
    fn test_exercise_view_drops_answer_key() {
        let mut exercise = Exercise::new("unit-1", ExerciseType::Choice, "2 + 2 = ?", json!(2));
        exercise.options = vec!["3".into(), "5".into(), "4".into()];

        let view = serde_json::to_value(ExerciseView::from(exercise)).unwrap();

        assert!(view.get("correct_answer").is_none());
        assert_eq!(view["options"], json!(["3", "5", "4"]));
        assert_eq!(view["exercise_type"], json!("choice"));
    }
}
