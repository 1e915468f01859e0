//! Handlers for the caller's customer interests.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use barter_db::models::interest::{EditInterests, SetInterests};

use crate::error::AppResult;
use crate::marketplace::interests;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/customer-interest
///
/// Replace the caller's interest list. Every id must name an existing category.
pub async fn set_interests(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SetInterests>,
) -> AppResult<impl IntoResponse> {
    let stored = interests::set(&state.pool, auth.user_id, &input.category_ids).await?;
    Ok(Json(DataResponse { data: stored }))
}

/// GET /api/v1/customer-interest
pub async fn get_interests(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stored = interests::get(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: stored }))
}

/// PUT /api/v1/customer-interest
///
/// Add and remove categories. 404 until the caller has submitted a list.
pub async fn edit_interests(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<EditInterests>,
) -> AppResult<impl IntoResponse> {
    let stored = interests::edit(&state.pool, auth.user_id, &input).await?;
    Ok(Json(DataResponse { data: stored }))
}
