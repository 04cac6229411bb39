//! Domain layer - Core business entities and logic
//!
//! Registration input, the validation error vocabulary, the user entity,
//! password hashing and the identity handed out after registration.
//! Nothing here touches storage or HTTP.

pub mod identity;
pub mod password;
pub mod registration;
pub mod user;

pub use identity::{Claims, Identity};
pub use password::Password;
pub use registration::{Field, RegistrationInput, Rule, ValidationErrorSet};
pub use user::{User, UserResponse};
