//! In-memory user repository.
//!
//! Serves the ephemeral server mode and tests that need real storage
//! semantics without PostgreSQL. Emails are unique, exactly like the
//! `users.email` index.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::user_repository::UserRepository;
use crate::domain::{Field, User};
use crate::errors::{AppError, AppResult};

/// Users keyed by email
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for MemoryUserStore {
    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self.users.read().await.contains_key(email))
    }

    async fn create(&self, name: String, email: String, password_hash: String) -> AppResult<User> {
        // Check and insert under one write guard
        let mut users = self.users.write().await;
        if users.contains_key(&email) {
            return Err(AppError::Conflict(Field::Email));
        }

        let user = User::new(name, email.clone(), password_hash);
        users.insert(email, user.clone());
        Ok(user)
    }
}
