//! Account registrar - turns valid registration input into an account.
//!
//! Validation always runs again here, whatever the caller checked before.
//! A duplicate email that slips past the uniqueness rule is caught by the
//! storage constraint and reported as [`AppError::Conflict`].

use async_trait::async_trait;
use std::sync::Arc;

use super::session::SessionManager;
use super::validator::RegistrationValidator;
use crate::domain::{Claims, Identity, Password, RegistrationInput, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Result of a registration attempt that did not fail.
#[derive(Debug, Clone)]
pub enum RegistrationOutcome {
    /// A new account was created and its identity established
    Registered { user: User, identity: Identity },
    /// The caller is already signed in; nothing was touched
    AlreadyAuthenticated,
}

/// Registration service trait for dependency injection.
#[async_trait]
pub trait Registrar: Send + Sync {
    /// Register a new account.
    ///
    /// `current` is the caller's verified identity, if any. An authenticated
    /// caller is short-circuited without validation or storage access.
    async fn register(
        &self,
        current: Option<Claims>,
        input: RegistrationInput,
    ) -> AppResult<RegistrationOutcome>;
}

/// Concrete implementation of Registrar
pub struct AccountRegistrar {
    users: Arc<dyn UserRepository>,
    validator: RegistrationValidator,
    sessions: Arc<dyn SessionManager>,
}

impl AccountRegistrar {
    pub fn new(
        users: Arc<dyn UserRepository>,
        validator: RegistrationValidator,
        sessions: Arc<dyn SessionManager>,
    ) -> Self {
        Self {
            users,
            validator,
            sessions,
        }
    }

    /// Argon2 is deliberately slow; keep it off the async workers.
    async fn hash_password(plain_text: String) -> AppResult<Password> {
        tokio::task::spawn_blocking(move || Password::new(&plain_text))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
    }
}

#[async_trait]
impl Registrar for AccountRegistrar {
    async fn register(
        &self,
        current: Option<Claims>,
        input: RegistrationInput,
    ) -> AppResult<RegistrationOutcome> {
        if let Some(claims) = current {
            tracing::debug!(user_id = %claims.sub, "Already authenticated, skipping registration");
            return Ok(RegistrationOutcome::AlreadyAuthenticated);
        }

        self.validator.validate(&input).await?;

        let name = input.trimmed_name().to_string();
        let email = input.normalized_email();
        let password = Self::hash_password(input.password).await?;

        let user = match self.users.create(name, email, password.into_string()).await {
            Ok(user) => user,
            Err(AppError::Conflict(field)) => {
                tracing::warn!(%field, "Registration lost a uniqueness race");
                return Err(AppError::Conflict(field));
            }
            Err(e) => return Err(e),
        };

        let identity = self.sessions.establish(&user)?;
        tracing::info!(user_id = %user.id, "User registered");

        Ok(RegistrationOutcome::Registered { user, identity })
    }
}
