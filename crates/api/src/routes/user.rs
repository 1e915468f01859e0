//! Route definitions for users, mounted at `/users`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// ```text
/// GET    /me              -> get_me
/// GET    /{id}            -> get_user
/// POST   /{id}/ratings    -> rate_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(user::get_me))
        .route("/{id}", get(user::get_user))
        .route("/{id}/ratings", post(user::rate_user))
}
