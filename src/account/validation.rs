//! Input normalization at the service boundary
//!
//! External identifiers arrive as strings. They are converted to the store's
//! native key type here, so a malformed id can never reach the conditional
//! update primitive as a valid-looking filter.

use thiserror::Error;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Malformed account id: '{0}'")]
    MalformedAccountId(String),

    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
}

/// Parse an external account id into the store's native key.
///
/// Accepts canonical hyphenated UUIDs only; rejects everything else before a
/// filter is built from it.
pub fn parse_account_id(raw: &str) -> Result<Uuid, ValidationError> {
    let raw = raw.trim();
    if raw.len() != 36 {
        return Err(ValidationError::MalformedAccountId(raw.to_string()));
    }
    Uuid::try_parse(raw).map_err(|_| ValidationError::MalformedAccountId(raw.to_string()))
}

pub fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}
