//! Liveness endpoint, mounted at the root outside `/api/v1`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Down,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"`, or `"degraded"` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub database: ComponentStatus,
    /// Latest applied migration version, when the database answered.
    pub schema_version: Option<i64>,
}

/// GET /health
///
/// Responds 503 while the database is unreachable so load balancers stop
/// routing exchange traffic to this instance.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let schema_version = match barter_db::health_check(&state.pool).await {
        Ok(()) => Some(barter_db::schema_version(&state.pool).await.unwrap_or_default()),
        Err(e) => {
            tracing::warn!(error = %e, "Health check: database unreachable");
            None
        }
    };

    let (code, status, database) = match schema_version {
        Some(_) => (StatusCode::OK, "ok", ComponentStatus::Up),
        None => (StatusCode::SERVICE_UNAVAILABLE, "degraded", ComponentStatus::Down),
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
        schema_version: schema_version.flatten(),
    };
    (code, Json(body))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
