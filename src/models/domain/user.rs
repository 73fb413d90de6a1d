use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password_hash: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default)]
    pub points: i64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Student,
    Admin,
}

impl User {
    pub fn new(username: &str, display_name: &str, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            display_name: display_name.to_string(),
            email: None,
            password_hash,
            role,
            grade: None,
            points: 0,
            created_at: Some(now),
            modified_at: Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation_defaults_to_zero_points() {
        let user = User::new("ming", "Xiao Ming", "hash".to_string(), UserRole::Student);

        assert_eq!(user.username, "ming");
        assert_eq!(user.points, 0);
        assert_eq!(user.role, UserRole::Student);
        assert!(Uuid::parse_str(&user.id).is_ok());
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let json = serde_json::to_string(&UserRole::Admin).unwrap();
        assert_eq!(json, "\"admin\"");
    }

    #[test]
    fn test_missing_role_deserializes_as_student() {
        let json = r#"{"id":"u1","username":"ming","display_name":"Ming","password_hash":"h"}"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert_eq!(user.role, UserRole::Student);
        assert_eq!(user.points, 0);
    }
}
