//! Caller identity for marketplace handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use barter_core::error::CoreError;
use barter_core::types::DbId;

use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::state::AppState;

/// The user making the request, taken from the bearer token.
///
/// Every `/api/v1` handler takes this extractor; a missing or invalid
/// token rejects the request with 401 before the handler body runs.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let claims = verify_access_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            CoreError::Unauthorized("Invalid or expired token".into())
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme name is matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Result<&str, CoreError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?
        .to_str()
        .map_err(|_| CoreError::Unauthorized("Malformed Authorization header".into()))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(token.trim())
        }
        _ => Err(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        )),
    }
}
