//! Handlers for public user profiles and ratings.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use barter_core::error::CoreError;
use barter_core::types::DbId;
use barter_db::models::rating::SubmitRating;
use barter_db::models::user::{AccountView, User, UserProfile};
use barter_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::marketplace::ratings;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_user(state: &AppState, user_id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))
}

/// GET /api/v1/users/me
///
/// The caller's own account, the only projection that carries an email.
pub async fn get_me(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let user = find_user(&state, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: AccountView::from(user),
    }))
}

/// GET /api/v1/users/{id}
///
/// Public profile, including the rating aggregate and completed-exchange count.
pub async fn get_user(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = find_user(&state, user_id).await?;
    Ok(Json(DataResponse {
        data: UserProfile::from(user),
    }))
}

/// POST /api/v1/users/{id}/ratings
///
/// Rate another user. Resubmitting replaces the caller's earlier score.
pub async fn rate_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<SubmitRating>,
) -> AppResult<impl IntoResponse> {
    let aggregate = ratings::submit(&state.pool, user_id, auth.user_id, input.score).await?;
    Ok(Json(DataResponse { data: aggregate }))
}
