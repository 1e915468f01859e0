//! HTTP error mapping.
//!
//! Every failure leaves the API as `{ "error": <message>, "code": <CODE> }`.
//! Domain errors come from [`CoreError`]; database errors are classified by
//! SQLSTATE so that constraint violations surface as client errors instead
//! of 500s.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use barter_core::error::CoreError;
use serde::Serialize;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// SQLSTATE codes the API distinguishes.
mod sqlstate {
    pub const UNIQUE_VIOLATION: &str = "23505";
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
    pub const CHECK_VIOLATION: &str = "23514";
}

/// Application-level error type for HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
        };

        (status, Json(ErrorBody { error, code })).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

/// Map a domain error to its status and code.
///
/// `InvalidState` shares 409 with `Conflict` but keeps its own code so
/// clients can tell a lost race on an exchange from a duplicate request.
fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::TokenMismatch => (StatusCode::BAD_REQUEST, "TOKEN_MISMATCH", core.to_string()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::InvalidState(msg) => (StatusCode::CONFLICT, "INVALID_STATE", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on `uq_*` constraints and indexes map to 409.
/// - Check violations on `ck_*` constraints and foreign-key violations map
///   to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            )
        }
        sqlx::Error::Database(db_err) => db_err,
        other => {
            tracing::error!(error = %other, "Database error");
            return internal();
        }
    };

    let constraint = db_err.constraint().unwrap_or("unknown");
    match db_err.code().as_deref() {
        Some(sqlstate::UNIQUE_VIOLATION) if constraint.starts_with("uq_") => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        Some(sqlstate::CHECK_VIOLATION) if constraint.starts_with("ck_") => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Value violates check constraint: {constraint}"),
        ),
        Some(sqlstate::FOREIGN_KEY_VIOLATION) => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Referenced record does not exist: {constraint}"),
        ),
        _ => {
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
    }
}
