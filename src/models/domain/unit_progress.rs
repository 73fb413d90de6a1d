use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// Per (student, unit) aggregate, recomputed from answer records and studied courses.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct UnitProgress {
    pub student_id: String,
    pub unit_id: String,
    pub attempts: u32,
    /// Distinct exercises with at least one submission.
    pub practiced: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub pending_review: u32,
    pub studied: u32,
    #[serde(default)]
    pub studied_course_ids: Vec<String>,
    pub mastery_score: f64,
    pub status: UnitStatus,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub last_activity_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::models::domain::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl UnitProgress {
    pub fn empty(student_id: &str, unit_id: &str) -> Self {
        UnitProgress {
            student_id: student_id.to_string(),
            unit_id: unit_id.to_string(),
            attempts: 0,
            practiced: 0,
            correct: 0,
            incorrect: 0,
            pending_review: 0,
            studied: 0,
            studied_course_ids: Vec::new(),
            mastery_score: 0.0,
            status: UnitStatus::NotStarted,
            completed_at: None,
            last_activity_at: None,
            updated_at: Utc::now(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == UnitStatus::Completed
    }
}
