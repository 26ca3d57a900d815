use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Password hashing error: {0}")]
pub struct PasswordError(String);

/// Hash a plain-text password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError(e.to_string()))
}

/// Check a plain-text password against a stored PHC hash string.
///
/// A malformed stored hash is an error; a mismatch is `Ok(false)`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Why a requested password change was refused.
#[derive(Debug, Error)]
pub enum PasswordChangeError {
    #[error("Current password is required to set a new one")]
    CurrentRequired,

    #[error("Current password is not correct")]
    CurrentIncorrect,

    #[error(transparent)]
    Hash(#[from] PasswordError),
}

/// Resolve the password part of a profile edit.
///
/// No `new_password` means no change (`Ok(None)`). Otherwise `current` must be
/// present and match `stored_hash`; the new password's hash is returned.
pub fn resolve_password_change(
    stored_hash: &str,
    current: Option<&str>,
    new_password: Option<&str>,
) -> Result<Option<String>, PasswordChangeError> {
    let Some(new_password) = new_password else {
        return Ok(None);
    };
    let current = current
        .filter(|c| !c.is_empty())
        .ok_or(PasswordChangeError::CurrentRequired)?;

    if !verify_password(current, stored_hash)? {
        return Err(PasswordChangeError::CurrentIncorrect);
    }
    Ok(Some(hash_password(new_password)?))
}
