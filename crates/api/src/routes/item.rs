//! Route definitions for the item registry, mounted at `/items`.

use axum::routing::get;
use axum::Router;

use crate::handlers::item;
use crate::state::AppState;

/// ```text
/// GET    /            -> list_items
/// POST   /            -> create_item
/// GET    /mine        -> list_my_items
/// GET    /{id}        -> get_item
/// PUT    /{id}        -> update_item
/// DELETE /{id}        -> delete_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(item::list_items).post(item::create_item))
        .route("/mine", get(item::list_my_items))
        .route(
            "/{id}",
            get(item::get_item)
                .put(item::update_item)
                .delete(item::delete_item),
        )
}
