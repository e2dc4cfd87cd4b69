//! Caller authentication shared by the REST and gRPC transports.

use chrono::{Duration, Utc};
use common::{EntityId, UserId};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authenticated identity attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub entity_id: EntityId,
}

impl Caller {
    /// Refuses requests that target another entity's data.
    pub fn authorize(&self, entity_id: EntityId) -> Result<(), AuthError> {
        if self.entity_id != entity_id {
            tracing::warn!(
                user_id = %self.user_id,
                caller_entity_id = %self.entity_id,
                req_entity_id = %entity_id,
                "entity mismatch"
            );
            return Err(AuthError::EntityMismatch);
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication required")]
    Missing,

    #[error("invalid authorization header")]
    MalformedHeader,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("access denied: entity mismatch")]
    EntityMismatch,
}

/// Resolves a bearer token into a [`Caller`].
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Result<Caller, AuthError>;
}

/// Extracts the token from an `Authorization: Bearer <token>` value.
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MalformedHeader)
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: UserId,
    entity_id: EntityId,
    exp: i64,
}

/// HS256 JWT authenticator.
pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Signs a token for `caller` that expires after `ttl`.
    pub fn issue_token(&self, caller: Caller, ttl: Duration) -> Result<String, AuthError> {
        let claims = Claims {
            sub: caller.user_id,
            entity_id: caller.entity_id,
            exp: (Utc::now() + ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, token: &str) -> Result<Caller, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(Caller {
            user_id: data.claims.sub,
            entity_id: data.claims.entity_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller() -> Caller {
        Caller {
            user_id: UserId::new(),
            entity_id: EntityId::new(),
        }
    }

    #[test]
    fn issued_token_round_trips() {
        let auth = JwtAuthenticator::new(b"secret");
        let caller = caller();
        let token = auth.issue_token(caller, Duration::hours(1)).unwrap();
        assert_eq!(auth.authenticate(&token).unwrap(), caller);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = JwtAuthenticator::new(b"one")
            .issue_token(caller(), Duration::hours(1))
            .unwrap();
        let err = JwtAuthenticator::new(b"two").authenticate(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = JwtAuthenticator::new(b"secret");
        let token = auth.issue_token(caller(), Duration::hours(-1)).unwrap();
        assert!(matches!(
            auth.authenticate(&token).unwrap_err(),
            AuthError::InvalidToken(_)
        ));
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(bearer_token("Bearer abc").unwrap(), "abc");
        assert!(matches!(
            bearer_token("Basic abc").unwrap_err(),
            AuthError::MalformedHeader
        ));
        assert!(bearer_token("Bearer ").is_err());
    }

    #[test]
    fn authorize_checks_entity() {
        let caller = caller();
        assert!(caller.authorize(caller.entity_id).is_ok());
        assert!(matches!(
            caller.authorize(EntityId::new()).unwrap_err(),
            AuthError::EntityMismatch
        ));
    }
}
