use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A grouping of courses and exercises within a subject.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Unit {
    pub id: String,
    pub subject_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Unit {
    pub fn new(subject_id: &str, title: &str, description: &str, order: i32) -> Self {
        let now = Utc::now();
        Unit {
            id: Uuid::new_v4().to_string(),
            subject_id: subject_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            order,
            created_at: Some(now),
            modified_at: Some(now),
        }
    }
}
