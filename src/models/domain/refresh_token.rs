use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Server-side record of an issued refresh JWT. Only the hash is stored, and a
/// token is single-use: rotation revokes it.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RefreshToken {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    #[serde(with = "crate::models::domain::timestamp")]
    pub expires_at: DateTime<Utc>,
    #[serde(with = "crate::models::domain::timestamp")]
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::models::domain::timestamp::option")]
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    pub fn new(user_id: String, token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            token_hash,
            expires_at,
            created_at: Utc::now(),
            revoked: false,
            revoked_at: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.revoked && self.expires_at > Utc::now()
    }

    pub fn revoke(&mut self) {
        if !self.revoked {
            self.revoked = true;
            self.revoked_at = Some(Utc::now());
        }
    }
}

pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token_expiring_in(delta: Duration) -> RefreshToken {
        RefreshToken::new("student-1".to_string(), hash_token("rt"), Utc::now() + delta)
    }

    #[test]
    fn expired_tokens_are_invalid() {
        assert!(!token_expiring_in(Duration::minutes(-1)).is_valid());
        assert!(token_expiring_in(Duration::hours(1)).is_valid());
    }

    #[test]
    fn revoke_keeps_the_first_timestamp() {
        let mut token = token_expiring_in(Duration::days(7));
        token.revoke();
        let first = token.revoked_at;
        token.revoke();

        assert!(!token.is_valid());
        assert!(first.is_some());
        assert_eq!(token.revoked_at, first);
    }

    #[test]
    fn hash_is_hex_sha256() {
        let hash = hash_token("my-secret-token");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash_token("my-secret-token"));
        assert_ne!(hash, hash_token("other-token"));
    }
}
