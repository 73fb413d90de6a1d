use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    auth::claims::{Claims, RefreshClaims, TokenKind, TOKEN_ISSUER},
    errors::{AppError, AppResult},
    models::domain::User,
};

/// Signs and verifies HS256 access and refresh tokens with one shared secret.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration_hours: i64,
    refresh_expiration_hours: i64,
}

impl JwtService {
    pub fn new(secret: &SecretString, expiration_hours: i64, refresh_expiration_hours: i64) -> Self {
        let secret = secret.expose_secret().as_bytes();
        let mut validation = Validation::default();
        validation.set_issuer(&[TOKEN_ISSUER]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            expiration_hours,
            refresh_expiration_hours,
        }
    }

    pub fn refresh_expiration_hours(&self) -> i64 {
        self.refresh_expiration_hours
    }

    pub fn create_token(&self, user: &User) -> AppResult<String> {
        self.sign(&Claims::new(user, self.expiration_hours))
    }

    pub fn create_refresh_token(&self, user_id: &str) -> AppResult<String> {
        self.sign(&RefreshClaims::new(user_id, self.refresh_expiration_hours))
    }

    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let claims: Claims = self.verify(token, "access")?;
        if claims.kind != TokenKind::Access {
            return Err(AppError::Unauthorized("Not an access token".to_string()));
        }
        Ok(claims)
    }

    pub fn validate_refresh_token(&self, token: &str) -> AppResult<RefreshClaims> {
        let claims: RefreshClaims = self.verify(token, "refresh")?;
        if claims.kind != TokenKind::Refresh {
            return Err(AppError::Unauthorized("Not a refresh token".to_string()));
        }
        Ok(claims)
    }

    fn sign<T: Serialize>(&self, claims: &T) -> AppResult<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to sign token: {}", e)))
    }

    fn verify<T: DeserializeOwned>(&self, token: &str, label: &str) -> AppResult<T> {
        decode::<T>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized(format!("The {} token has expired", label))
                }
                ErrorKind::InvalidSignature => {
                    AppError::Unauthorized(format!("The {} token signature is invalid", label))
                }
                _ => AppError::Unauthorized(format!("Invalid {} token: {}", label, e)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, models::domain::UserRole};

    fn service() -> JwtService {
        JwtService::new(&Config::test_config().jwt_secret, 1, 168)
    }

    #[test]
    fn access_token_round_trips_claims() {
        let jwt_service = service();
        let user = User::new("ming", "Ming", "hash".to_string(), UserRole::Admin);

        let token = jwt_service.create_token(&user).unwrap();
        let claims = jwt_service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert!(claims.is_admin());
        assert_eq!(claims.iss, TOKEN_ISSUER);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            service().validate_token("invalid.token.here"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn token_kinds_are_not_interchangeable() {
        let jwt_service = service();
        let user = User::new("ming", "Ming", "hash".to_string(), UserRole::Student);
        let access = jwt_service.create_token(&user).unwrap();
        let refresh = jwt_service.create_refresh_token(&user.id).unwrap();

        assert!(jwt_service.validate_refresh_token(&refresh).is_ok());
        assert!(matches!(
            jwt_service.validate_refresh_token(&access),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            jwt_service.validate_token(&refresh),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn tokens_from_another_secret_fail() {
        let other_secret = SecretString::from("another-secret-value".to_string());
        let other = JwtService::new(&other_secret, 1, 1);
        let user = User::new("ming", "Ming", "hash".to_string(), UserRole::Student);
        let token = other.create_token(&user).unwrap();

        assert!(service().validate_token(&token).is_err());
    }
}
