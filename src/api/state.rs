//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{RegistrationValidator, Registrar, ServiceContainer, Services, SessionManager};

/// Where user accounts live, for health reporting.
#[derive(Clone)]
pub enum Storage {
    Database(Arc<Database>),
    Memory,
}

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Registration service
    pub registrar: Arc<dyn Registrar>,
    /// Field validation, used for live validation
    pub validator: RegistrationValidator,
    /// Identity issuing and verification
    pub sessions: Arc<dyn SessionManager>,
    /// Backing store
    pub storage: Storage,
    /// Redirect target for authenticated callers
    pub home_path: String,
}

impl AppState {
    /// Create application state backed by PostgreSQL.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let home_path = config.home_path.clone();
        let container = Services::from_connection(database.get_connection(), config);

        Self::new(&container, Storage::Database(database), home_path)
    }

    /// Create application state backed by process memory.
    pub fn in_memory(config: Config) -> Self {
        let home_path = config.home_path.clone();
        let container = Services::in_memory(config);

        Self::new(&container, Storage::Memory, home_path)
    }

    /// Create application state from an already wired service container.
    pub fn new(services: &dyn ServiceContainer, storage: Storage, home_path: String) -> Self {
        Self {
            registrar: services.registrar(),
            validator: services.validator(),
            sessions: services.sessions(),
            storage,
            home_path,
        }
    }
}
