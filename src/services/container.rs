//! Service Container - Centralized service access.
//!
//! Wires the repository, validator, session issuer and registrar together
//! once, so handlers only see trait objects.

use std::sync::Arc;

use super::{AccountRegistrar, JwtSessions, RegistrationValidator, Registrar, SessionManager};
use crate::config::Config;
use crate::infra::{MemoryUserStore, UserRepository, UserStore};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get registration service
    fn registrar(&self) -> Arc<dyn Registrar>;

    /// Get the registration validator
    fn validator(&self) -> RegistrationValidator;

    /// Get session service
    fn sessions(&self) -> Arc<dyn SessionManager>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    registrar: Arc<dyn Registrar>,
    validator: RegistrationValidator,
    sessions: Arc<dyn SessionManager>,
}

impl Services {
    /// Build every service on top of the given user repository
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        let validator = RegistrationValidator::new(users.clone());
        let sessions: Arc<dyn SessionManager> = Arc::new(JwtSessions::new(config));
        let registrar = Arc::new(AccountRegistrar::new(
            users,
            validator.clone(),
            sessions.clone(),
        ));

        Self {
            registrar,
            validator,
            sessions,
        }
    }

    /// Create service container backed by PostgreSQL
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        Self::new(Arc::new(UserStore::new(db)), config)
    }

    /// Create service container backed by process memory
    pub fn in_memory(config: Config) -> Self {
        Self::new(Arc::new(MemoryUserStore::new()), config)
    }
}

impl ServiceContainer for Services {
    fn registrar(&self) -> Arc<dyn Registrar> {
        self.registrar.clone()
    }

    fn validator(&self) -> RegistrationValidator {
        self.validator.clone()
    }

    fn sessions(&self) -> Arc<dyn SessionManager> {
        self.sessions.clone()
    }
}
