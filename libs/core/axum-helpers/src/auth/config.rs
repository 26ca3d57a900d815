//! Token signing configuration.

use core_config::{ConfigError, FromEnv, env_parse_or, env_required};

/// Default token lifetime in days.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 10;

const MIN_SECRET_LEN: usize = 32;

/// JWT authentication configuration.
///
/// Loaded from environment variables:
/// - `JWT_SECRET` (required) - Must be at least 32 characters
/// - `JWT_TTL_DAYS` (optional) - Token lifetime, defaults to 10
#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// JWT signing secret (minimum 32 characters)
    pub secret: String,
    pub ttl_days: i64,
}

impl JwtConfig {
    /// Build a config directly, e.g. for tests.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        check_secret(&secret)?;
        Ok(Self {
            secret,
            ttl_days: DEFAULT_TOKEN_TTL_DAYS,
        })
    }
}

fn check_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::ParseError {
            key: "JWT_SECRET".to_string(),
            details: format!(
                "must be at least {MIN_SECRET_LEN} characters (got {}). Generate one with: openssl rand -base64 32",
                secret.len()
            ),
        });
    }
    Ok(())
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        check_secret(&secret)?;

        let ttl_days = env_parse_or("JWT_TTL_DAYS", DEFAULT_TOKEN_TTL_DAYS)?;
        if ttl_days < 1 {
            return Err(ConfigError::ParseError {
                key: "JWT_TTL_DAYS".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self { secret, ttl_days })
    }
}
