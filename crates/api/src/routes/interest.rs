//! Route definitions for customer interests, mounted at `/customer-interest`.

use axum::routing::get;
use axum::Router;

use crate::handlers::interest;
use crate::state::AppState;

/// ```text
/// GET    /     -> get_interests
/// POST   /     -> set_interests
/// PUT    /     -> edit_interests
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(interest::get_interests)
            .post(interest::set_interests)
            .put(interest::edit_interests),
    )
}
