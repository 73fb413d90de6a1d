use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Course {
    pub id: String,
    pub unit_id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Course {
    pub fn new(unit_id: &str, title: &str, content: &str, media_url: Option<String>, order: i32) -> Self {
        let now = Utc::now();
        Course {
            id: Uuid::new_v4().to_string(),
            unit_id: unit_id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            media_url,
            order,
            created_at: Some(now),
            modified_at: Some(now),
        }
    }
}
