use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const DEFAULT_EXERCISE_POINTS: i32 = 10;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Exercise {
    pub id: String,
    pub unit_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    pub exercise_type: ExerciseType,
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Shape depends on `exercise_type`: an index for `choice`, a sequence or
    /// index mapping for `matching`/`drag_drop`, one string per blank for `fill_blank`.
    #[serde(default)]
    pub correct_answer: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default)]
    pub knowledge_points: Vec<String>,
    #[serde(default = "default_points")]
    pub points: i32,
    #[serde(default)]
    pub order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub modified_at: Option<DateTime<Utc>>,
}

fn default_points() -> i32 {
    DEFAULT_EXERCISE_POINTS
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Enum)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Choice,
    Matching,
    DragDrop,
    FillBlank,
    Sort,
    Math,
    Application,
}

impl ExerciseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::Choice => "choice",
            ExerciseType::Matching => "matching",
            ExerciseType::DragDrop => "drag_drop",
            ExerciseType::FillBlank => "fill_blank",
            ExerciseType::Sort => "sort",
            ExerciseType::Math => "math",
            ExerciseType::Application => "application",
        }
    }
}

impl Exercise {
    pub fn new(unit_id: &str, exercise_type: ExerciseType, prompt: &str, correct_answer: Value) -> Self {
        let now = Utc::now();
        Exercise {
            id: Uuid::new_v4().to_string(),
            unit_id: unit_id.to_string(),
            course_id: None,
            exercise_type,
            prompt: prompt.to_string(),
            options: Vec::new(),
            correct_answer,
            explanation: None,
            knowledge_points: Vec::new(),
            points: DEFAULT_EXERCISE_POINTS,
            order: 0,
            created_at: Some(now),
            modified_at: Some(now),
        }
    }
}
