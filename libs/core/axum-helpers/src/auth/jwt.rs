use super::config::JwtConfig;
use crate::errors::{AppError, messages};
use chrono::{Duration, Utc};
use core_accounts::Role;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,   // Identity id (ObjectId hex)
    pub name: String,  // "first last"
    pub email: String, // Identity email
    pub phone: String, // Mobile phone
    pub role: Role,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
    pub jti: String,
}

/// The identity a token is issued for
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),

    #[error("Token rejected: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Sign(e) => AppError::InternalServerError(e.to_string()),
            TokenError::Invalid(_) => AppError::InvalidToken(messages::INVALID_TOKEN),
        }
    }
}

/// Issues and verifies HS256 bearer tokens.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!(ttl_days = config.ttl_days, "JWT auth initialized");
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::days(config.ttl_days),
        }
    }

    /// Override the token lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sign a fresh token for `subject`. Every call yields a distinct `jti`.
    pub fn issue(&self, subject: TokenSubject<'_>) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: subject.id.to_string(),
            name: subject.name.to_string(),
            email: subject.email.to_string(),
            phone: subject.phone.to_string(),
            role: subject.role,
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Sign)
    }

    /// Verify signature and expiry, then decode claims.
    pub fn verify(&self, token: &str) -> Result<JwtClaims, TokenError> {
        decode::<JwtClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("this-is-a-valid-secret-with-32-chars!").unwrap())
    }

    fn subject() -> TokenSubject<'static> {
        TokenSubject {
            id: "665f1c2ab7e4a90d3c8f0a11",
            name: "Mona Adel",
            email: "mona@example.com",
            phone: "01000000000",
            role: Role::Admin,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let auth = auth();
        let token = auth.issue(subject()).unwrap();
        let claims = auth.verify(&token).unwrap();

        assert_eq!(claims.sub, "665f1c2ab7e4a90d3c8f0a11");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.email, "mona@example.com");
        assert_eq!(claims.exp - claims.iat, Duration::days(10).num_seconds());
    }

    #[test]
    fn test_each_token_is_unique() {
        let auth = auth();
        let a = auth.verify(&auth.issue(subject()).unwrap()).unwrap();
        let b = auth.verify(&auth.issue(subject()).unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = auth().issue(subject()).unwrap();
        let other =
            JwtAuth::new(&JwtConfig::new("another-secret-that-is-long-enough-123").unwrap());
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = auth().with_ttl(Duration::minutes(-5));
        let token = auth.issue(subject()).unwrap();
        assert!(auth.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(auth().verify("not.a.token").is_err());
    }

    #[test]
    fn test_invalid_token_maps_to_error_tag() {
        let err = auth().verify("x").unwrap_err();
        assert!(matches!(AppError::from(err), AppError::InvalidToken(_)));
    }
}
