//! HTTP request handlers.

pub mod register_handler;

pub use register_handler::register_routes;
