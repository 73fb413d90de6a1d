use std::sync::Arc;

use chrono::{Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use validator::Validate;

use crate::{
    auth::{hash_password, verify_password, JwtService},
    errors::{AppError, AppResult},
    models::{
        domain::{hash_token, RefreshToken, User, UserRole},
        dto::{
            request::{LoginRequest, RegisterRequest},
            response::{AuthResponse, RefreshTokenResponse},
        },
    },
    repositories::{RefreshTokenRepository, UserRepository},
};

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        jwt_service: JwtService,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            jwt_service,
        }
    }

    /// Student self-registration.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        if self.users.find_by_username(&request.username).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "Username '{}' is taken",
                request.username
            )));
        }

        let password_hash = hash_password(&request.password)?;
        let mut user = User::new(
            &request.username,
            &request.display_name,
            password_hash,
            UserRole::Student,
        );
        user.email = request.email;
        user.grade = request.grade;

        let user = self.users.create(user).await?;
        log::info!("registered student {}", user.username);

        self.issue_tokens(user).await
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .filter(|user| verify_password(&request.password, &user.password_hash))
            .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

        self.issue_tokens(user).await
    }

    /// Exchange a refresh token for a new pair. The presented token is revoked.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<RefreshTokenResponse> {
        let claims = self.jwt_service.validate_refresh_token(refresh_token)?;

        let token_hash = hash_token(refresh_token);
        let stored = self
            .refresh_tokens
            .find_by_token_hash(&token_hash)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unknown refresh token".to_string()))?;

        if !stored.is_valid() || stored.user_id != claims.sub {
            return Err(AppError::Unauthorized(
                "Refresh token revoked or expired".to_string(),
            ));
        }

        let user = self
            .users
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

        self.refresh_tokens.revoke_by_token_hash(&token_hash).await?;

        let issued = self.issue_tokens(user).await?;
        Ok(RefreshTokenResponse {
            token: issued.token,
            refresh_token: issued.refresh_token,
        })
    }

    /// Revoke every refresh token the user holds.
    pub async fn logout(&self, user_id: &str) -> AppResult<u64> {
        let revoked = self.refresh_tokens.revoke_all_for_user(user_id).await?;
        log::debug!("revoked {} refresh tokens for {}", revoked, user_id);
        Ok(revoked)
    }

    /// Create the configured admin account unless the username already exists.
    pub async fn ensure_admin(&self, username: &str, password: &SecretString) -> AppResult<bool> {
        if self.users.find_by_username(username).await?.is_some() {
            return Ok(false);
        }

        let password_hash = hash_password(password.expose_secret())?;
        self.users
            .create(User::new(username, username, password_hash, UserRole::Admin))
            .await?;

        log::info!("created bootstrap admin '{}'", username);
        Ok(true)
    }

    async fn issue_tokens(&self, user: User) -> AppResult<AuthResponse> {
        let token = self.jwt_service.create_token(&user)?;
        let refresh_token = self.jwt_service.create_refresh_token(&user.id)?;

        let expires_at = Utc::now() + Duration::hours(self.jwt_service.refresh_expiration_hours());
        self.refresh_tokens
            .create(RefreshToken::new(
                user.id.clone(),
                hash_token(&refresh_token),
                expires_at,
            ))
            .await?;

        Ok(AuthResponse {
            token,
            refresh_token,
            user: user.into(),
        })
    }
}
