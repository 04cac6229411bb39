//! Custom request extractors.

mod identity;
mod json_body;

pub use identity::MaybeAuthenticated;
pub use json_body::JsonBody;
