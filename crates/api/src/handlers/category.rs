//! Handlers for item categories.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use barter_core::error::CoreError;
use barter_db::models::category::CreateCategory;
use barter_db::repositories::CategoryRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list_categories(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/categories
///
/// Duplicate names are rejected with 409 by the `uq_categories_name`
/// constraint.
pub async fn create_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Category name must not be empty".into()).into());
    }

    let category = CategoryRepo::create(&state.pool, &input).await?;

    tracing::info!(category_id = category.id, user_id = auth.user_id, "Category created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}
