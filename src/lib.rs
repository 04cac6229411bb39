//! Account Registrar - user registration as a service
//!
//! Validates registration input field by field, creates the account with a
//! hashed password and establishes an identity for the new user.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Registration input, validation results, users, identities
//! - **services**: Validator, registrar and session issuer
//! - **infra**: Database, migrations and user repositories
//! - **api**: HTTP handlers, extractors and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Start without a database
//! cargo run -- serve --ephemeral
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Field, Identity, Password, RegistrationInput, Rule, User, ValidationErrorSet};
pub use errors::{AppError, AppResult};
pub use services::{Registrar, RegistrationOutcome, RegistrationValidator};
