use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Subject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Subject {
    pub fn new(name: &str, description: &str, order: i32) -> Self {
        let now = Utc::now();
        Subject {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            order,
            created_at: Some(now),
            modified_at: Some(now),
        }
    }
}
