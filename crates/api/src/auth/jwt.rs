//! Bearer access tokens.
//!
//! Tokens are HS256 JWTs whose subject is the user id. Registration and
//! login live in a separate identity service that shares `JWT_SECRET`;
//! this crate only verifies tokens, and mints them for tests and tooling.

use barter_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Value of the `iss` claim. Tokens from other issuers are rejected.
pub const ISSUER: &str = "barter";

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The authenticated user's id.
    pub sub: DbId,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Load from `JWT_SECRET` (required) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default `60`).
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse()
                .expect("JWT_ACCESS_EXPIRY_MINS must be a whole number of minutes"),
            Err(_) => DEFAULT_ACCESS_EXPIRY_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Sign an access token for `user_id`.
pub fn issue_access_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        iss: ISSUER.to_string(),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature, expiry and issuer, returning the claims.
pub fn verify_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[ISSUER]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}
