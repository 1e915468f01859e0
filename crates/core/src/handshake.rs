//! Completion handshake tokens.
//!
//! A token is issued when the owner accepts an exchange and must be
//! presented to finalize it. Tokens are only honoured while the exchange is
//! `exchanging`; after that every submission is refused regardless of the
//! token value.

use uuid::Uuid;

use crate::error::CoreError;
use crate::exchange::ExchangeStatus;

/// Generate a fresh, unguessable completion token (UUID v4).
pub fn generate_token() -> String {
    Uuid::new_v4().to_string()
}

/// Normalize a user-supplied token for comparison.
fn normalize(token: &str) -> String {
    token.trim().to_ascii_lowercase()
}

/// Compare two tokens without short-circuiting on the first differing byte.
pub fn tokens_match(stored: &str, submitted: &str) -> bool {
    let a = normalize(stored);
    let b = normalize(submitted);
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Verify a completion token submission against the exchange's state.
///
/// Status is checked before the token, so a spent or never-issued token
/// reports [`CoreError::InvalidState`] rather than a mismatch.
pub fn verify(
    status: ExchangeStatus,
    stored: Option<&str>,
    submitted: &str,
) -> Result<(), CoreError> {
    if status != ExchangeStatus::Exchanging {
        return Err(CoreError::InvalidState(format!(
            "Cannot confirm an exchange that is {status}"
        )));
    }
    let stored = stored.ok_or_else(|| {
        CoreError::Internal("Exchange is exchanging but has no completion token".to_string())
    })?;
    if tokens_match(stored, submitted) {
        Ok(())
    } else {
        Err(CoreError::TokenMismatch)
    }
}
