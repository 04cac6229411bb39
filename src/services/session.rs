//! Session issuer - binds a caller to a user account.
//!
//! Identities are stateless HS256 JWTs; nothing is stored server side.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Claims, Identity, User};
use crate::errors::{AppError, AppResult};

/// Session service trait for dependency injection.
pub trait SessionManager: Send + Sync {
    /// Establish a new identity bound to `user`
    fn establish(&self, user: &User) -> AppResult<Identity>;

    /// Verify a bearer token and extract its claims
    fn verify(&self, token: &str) -> AppResult<Claims>;
}

/// JWT-backed implementation of SessionManager
pub struct JwtSessions {
    config: Config,
}

impl JwtSessions {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl SessionManager for JwtSessions {
    fn establish(&self, user: &User) -> AppResult<Identity> {
        let hours = self.config.jwt_expiration_hours();
        let out_of_range =
            || AppError::Config(format!("Token lifetime of {} hours is out of range", hours));

        let now = Utc::now();
        let expires_at = Duration::try_hours(hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(out_of_range)?;
        let expires_in = hours.checked_mul(SECONDS_PER_HOUR).ok_or_else(out_of_range)?;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret_bytes()),
        )?;

        Ok(Identity {
            user_id: user.id,
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
        })
    }

    fn verify(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEV_JWT_SECRET, MAX_JWT_EXPIRATION_HOURS};

    fn sessions() -> JwtSessions {
        JwtSessions::new(Config::new(DEV_JWT_SECRET).unwrap())
    }

    fn user() -> User {
        User::new(
            "Tall Stack".to_string(),
            "tallstack@example.com".to_string(),
            "hashed".to_string(),
        )
    }

    #[test]
    fn test_establish_then_verify() {
        let sessions = sessions();
        let user = user();

        let identity = sessions.establish(&user).unwrap();
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.token_type, "Bearer");
        assert_eq!(identity.expires_in, 24 * 3600);

        let claims = sessions.verify(&identity.access_token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "tallstack@example.com");
    }

    #[test]
    fn test_longest_lifetime_establishes() {
        let config = Config::new(DEV_JWT_SECRET)
            .unwrap()
            .with_jwt_expiration_hours(MAX_JWT_EXPIRATION_HOURS)
            .unwrap();
        let identity = JwtSessions::new(config).establish(&user()).unwrap();

        assert_eq!(identity.expires_in, MAX_JWT_EXPIRATION_HOURS * 3600);
        let claims = sessions().verify(&identity.access_token).unwrap();
        assert_eq!(claims.exp - claims.iat, MAX_JWT_EXPIRATION_HOURS * 3600);
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = JwtSessions::new(Config::new("another-secret-of-at-least-32-chars!").unwrap());
        let identity = other.establish(&user()).unwrap();

        let result = sessions().verify(&identity.access_token);
        assert!(matches!(result, Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(sessions().verify("not-a-token").is_err());
    }
}
