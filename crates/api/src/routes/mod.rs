pub mod category;
pub mod exchange;
pub mod health;
pub mod interest;
pub mod item;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every route requires a Bearer access token.
///
/// ```text
/// /categories                                      list, create
///
/// /items                                           list, create
/// /items/mine                                      caller's items
/// /items/{id}                                      get, update, delete
///
/// /exchanges/request                               create exchange (POST)
/// /exchanges/exchange-request                      eligibility check (POST)
/// /exchanges/incoming                              requests for caller's items
/// /exchanges/outgoing                              caller's requests
/// /exchanges/accept                                accept (POST)
/// /exchanges/reject                                reject (POST)
/// /exchanges/check-uuid                            confirm with token (POST)
/// /exchanges/{id}                                  delete
///
/// /customer-interest                               get, set (POST), edit (PUT)
///
/// /users/me                                        caller's account
/// /users/{id}                                      public profile
/// /users/{id}/ratings                              rate user (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", category::router())
        .nest("/items", item::router())
        .nest("/exchanges", exchange::router())
        .nest("/customer-interest", interest::router())
        .nest("/users", user::router())
}
