//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

pub mod container;
mod registrar;
mod session;
mod validator;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use registrar::{AccountRegistrar, Registrar, RegistrationOutcome};
pub use session::{JwtSessions, SessionManager};
pub use validator::RegistrationValidator;
