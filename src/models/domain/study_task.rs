use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Open,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::Done => "done",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct StudyTask {
    pub id: String,
    pub student_id: String,
    pub unit_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub due_at: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub created_by: String,
    #[serde(with = "crate::models::domain::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl StudyTask {
    pub fn new(student_id: &str, unit_id: &str, title: &str, created_by: &str) -> Self {
        StudyTask {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            unit_id: unit_id.to_string(),
            title: title.to_string(),
            note: None,
            due_at: None,
            status: TaskStatus::Open,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}
