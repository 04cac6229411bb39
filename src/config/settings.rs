//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_HOME_PATH, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, DEV_JWT_SECRET, MAX_JWT_EXPIRATION_HOURS, MIN_JWT_EXPIRATION_HOURS,
    MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Redirect target for callers that are already authenticated
    pub home_path: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("home_path", &self.home_path)
            .finish()
    }
}

impl Config {
    /// Build a configuration with default settings and the given JWT secret.
    ///
    /// # Errors
    /// Returns a config error if the secret is shorter than
    /// [`MIN_JWT_SECRET_LENGTH`].
    pub fn new(jwt_secret: impl Into<String>) -> AppResult<Self> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::Config(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret,
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            home_path: DEFAULT_HOME_PATH.to_string(),
        })
    }

    /// Replace the identity token lifetime.
    ///
    /// # Errors
    /// Returns a config error unless `hours` lies within
    /// [`MIN_JWT_EXPIRATION_HOURS`]..=[`MAX_JWT_EXPIRATION_HOURS`].
    pub fn with_jwt_expiration_hours(mut self, hours: i64) -> AppResult<Self> {
        if !(MIN_JWT_EXPIRATION_HOURS..=MAX_JWT_EXPIRATION_HOURS).contains(&hours) {
            return Err(AppError::Config(format!(
                "JWT_EXPIRATION_HOURS must be between {} and {}, got {}",
                MIN_JWT_EXPIRATION_HOURS, MAX_JWT_EXPIRATION_HOURS, hours
            )));
        }

        self.jwt_expiration_hours = hours;
        Ok(self)
    }

    /// Load configuration from `.env` and environment variables.
    ///
    /// # Errors
    /// Fails if `JWT_SECRET` is missing in a release build or too short, or
    /// if `JWT_EXPIRATION_HOURS` is not a whole number of hours in range.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => {
                return Err(AppError::Config(
                    "JWT_SECRET environment variable must be set in production".to_string(),
                ))
            }
        };

        let mut config = Self::new(jwt_secret)?;

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Ok(raw) = env::var("JWT_EXPIRATION_HOURS") {
            let hours = raw.trim().parse().map_err(|_| {
                AppError::Config(format!("JWT_EXPIRATION_HOURS is not a whole number: {}", raw))
            })?;
            config = config.with_jwt_expiration_hours(hours)?;
        }
        if let Ok(host) = env::var("SERVER_HOST") {
            config.server_host = host;
        }
        if let Some(port) = env::var("SERVER_PORT").ok().and_then(|v| v.parse().ok()) {
            config.server_port = port;
        }
        if let Ok(home) = env::var("HOME_PATH") {
            config.home_path = home;
        }

        Ok(config)
    }

    /// Identity token lifetime in hours.
    pub fn jwt_expiration_hours(&self) -> i64 {
        self.jwt_expiration_hours
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
