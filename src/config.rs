use std::env;
use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

const DEFAULT_JWT_SECRET: &str = "dev_secret_key_change_in_production";

#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: String,
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub refresh_expiration_hours: i64,
    pub cors_allowed_origin: String,
    pub upload_dir: String,
    pub public_base_url: String,
    pub max_upload_bytes: usize,
    pub mastery_window: usize,
    pub admin_username: Option<String>,
    pub admin_password: Option<SecretString>,
}

impl Config {
    pub fn from_env() -> Self {
        let web_server_host =
            env::var("WEB_SERVER_HOST").unwrap_or_else(|_| "localhost".to_string());
        let web_server_port = env::var("WEB_SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Self {
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "learnpath-local".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://{}:{}", web_server_host, web_server_port)),
            web_server_host,
            web_server_port,
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            refresh_expiration_hours: env::var("REFRESH_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(168),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "*".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            mastery_window: env::var("MASTERY_WINDOW")
                .ok()
                .and_then(|w| w.parse().ok())
                .filter(|w: &usize| *w > 0)
                .unwrap_or(10),
            admin_username: env::var("ADMIN_USERNAME").ok().filter(|u| !u.is_empty()),
            admin_password: env::var("ADMIN_PASSWORD")
                .ok()
                .filter(|p| !p.is_empty())
                .map(SecretString::from),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Validate that production-critical configuration is set.
    pub fn validate_for_production(&self) -> AppResult<()> {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEFAULT_JWT_SECRET {
            return Err(AppError::InternalError(
                "JWT_SECRET is using the default value. Set JWT_SECRET to a secure random string."
                    .to_string(),
            ));
        }

        if jwt_secret.len() < 32 {
            return Err(AppError::InternalError(format!(
                "JWT_SECRET is too short ({}). Must be at least 32 characters.",
                jwt_secret.len()
            )));
        }

        if self.cors_allowed_origin == "*" {
            return Err(AppError::InternalError(
                "CORS_ALLOWED_ORIGIN must name the client origin in production.".to_string(),
            ));
        }

        Ok(())
    }

    pub fn test_config() -> Self {
        Self {
            app_env: "test".to_string(),
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "learnpath-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            refresh_expiration_hours: 24,
            cors_allowed_origin: "*".to_string(),
            upload_dir: std::env::temp_dir()
                .join("learnpath-test-uploads")
                .to_string_lossy()
                .into_owned(),
            public_base_url: "http://127.0.0.1:8080".to_string(),
            max_upload_bytes: 1024,
            mastery_window: 10,
            admin_username: None,
            admin_password: None,
        }
    }
}
