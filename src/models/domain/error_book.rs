use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry per (student, exercise) the student has answered wrongly.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct ErrorBookEntry {
    pub id: String,
    pub student_id: String,
    pub exercise_id: String,
    pub unit_id: String,
    pub wrong_count: u32,
    #[graphql(skip)]
    #[serde(default)]
    pub last_answer: Value,
    pub mastered: bool,
    #[serde(with = "crate::models::domain::timestamp")]
    pub first_wrong_at: DateTime<Utc>,
    #[serde(with = "crate::models::domain::timestamp")]
    pub last_wrong_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub mastered_at: Option<DateTime<Utc>>,
}
