use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{User, UserRole};

pub const TOKEN_ISSUER: &str = "learnpath";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Access-token payload. `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: UserRole,
    pub kind: TokenKind,
    pub iss: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn new(user: &User, expiration_hours: i64) -> Self {
        let (iat, exp) = window(expiration_hours);
        Self {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            kind: TokenKind::Access,
            iss: TOKEN_ISSUER.to_string(),
            iat,
            exp,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Refresh-token payload. `jti` makes two tokens issued in the same second distinct,
/// so their stored hashes never collide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub kind: TokenKind,
    pub jti: String,
    pub iss: String,
    pub exp: usize,
    pub iat: usize,
}

impl RefreshClaims {
    pub fn new(user_id: &str, expiration_hours: i64) -> Self {
        let (iat, exp) = window(expiration_hours);
        Self {
            sub: user_id.to_string(),
            kind: TokenKind::Refresh,
            jti: Uuid::new_v4().to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat,
            exp,
        }
    }
}

fn window(hours: i64) -> (usize, usize) {
    let now = Utc::now();
    (
        now.timestamp() as usize,
        (now + Duration::hours(hours)).timestamp() as usize,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_claims_carry_identity_and_role() {
        let user = User::new("ming", "Ming", "hash".to_string(), UserRole::Student);
        let claims = Claims::new(&user, 24);

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "ming");
        assert_eq!(claims.kind, TokenKind::Access);
        assert!(!claims.is_admin());
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn refresh_claims_are_unique() {
        let first = RefreshClaims::new("user-1", 168);
        let second = RefreshClaims::new("user-1", 168);

        assert_eq!(first.kind, TokenKind::Refresh);
        assert_ne!(first.jti, second.jti);
    }
}
