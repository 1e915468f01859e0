//! Route definitions for categories, mounted at `/categories`.

use axum::routing::get;
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

/// ```text
/// GET    /     -> list_categories
/// POST   /     -> create_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(category::list_categories).post(category::create_category),
    )
}
