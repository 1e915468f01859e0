//! Handlers for the item registry.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use barter_core::error::CoreError;
use barter_core::types::DbId;
use barter_db::models::item::{CreateItem, ItemView, UpdateItem};
use barter_db::repositories::ItemRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::marketplace::items;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Look up an item with its owner and category, or return a 404.
async fn find_view(pool: &PgPool, id: DbId) -> AppResult<ItemView> {
    ItemRepo::find_detail(pool, id)
        .await?
        .map(ItemView::from)
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))
}

/// POST /api/v1/items
pub async fn create_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateItem>,
) -> AppResult<impl IntoResponse> {
    let item = items::create(&state.pool, auth.user_id, &input).await?;
    let view = find_view(&state.pool, item.id).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// GET /api/v1/items
pub async fn list_items(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = ItemRepo::list(&state.pool).await?;
    let views: Vec<ItemView> = rows.into_iter().map(ItemView::from).collect();

    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/items/mine
pub async fn list_my_items(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = ItemRepo::list_by_owner(&state.pool, auth.user_id).await?;
    let views: Vec<ItemView> = rows.into_iter().map(ItemView::from).collect();

    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/items/{id}
pub async fn get_item(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let view = find_view(&state.pool, item_id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/items/{id}
///
/// Owner only. Refused with 409 while the item is part of an active exchange.
pub async fn update_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    Json(input): Json<UpdateItem>,
) -> AppResult<impl IntoResponse> {
    items::update(&state.pool, auth.user_id, item_id, &input).await?;
    let view = find_view(&state.pool, item_id).await?;

    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/items/{id}
///
/// Owner only. Refused with 409 while the item is part of an active exchange.
pub async fn delete_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    items::delete(&state.pool, auth.user_id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
