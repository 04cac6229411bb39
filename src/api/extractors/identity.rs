//! Optional caller identity, read from the `Authorization` header.

use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use std::convert::Infallible;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::Claims;

/// Claims of the caller if it presented a valid bearer token.
///
/// Guest routes never reject: a missing, malformed or expired token simply
/// yields `None`.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticated(pub Option<Claims>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthenticated {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX));

        let claims = match token {
            Some(token) => match state.sessions.verify(token) {
                Ok(claims) => Some(claims),
                Err(e) => {
                    tracing::debug!("Ignoring rejected bearer token: {}", e);
                    None
                }
            },
            None => None,
        };

        Ok(MaybeAuthenticated(claims))
    }
}
