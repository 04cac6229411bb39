//! API layer - HTTP handlers and routes
//!
//! A thin caller of the services layer:
//! - Request handlers
//! - Custom extractors (caller identity, JSON bodies)
//! - Route definitions and OpenAPI docs

pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::{AppState, Storage};
