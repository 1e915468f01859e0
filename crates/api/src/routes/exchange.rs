//! Route definitions for exchange negotiation, mounted at `/exchanges`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::exchange;
use crate::state::AppState;

/// ```text
/// POST   /request              -> request_exchange
/// POST   /exchange-request     -> check_eligibility
/// GET    /incoming             -> list_incoming
/// GET    /outgoing             -> list_outgoing
/// POST   /accept               -> accept_exchange
/// POST   /reject               -> reject_exchange
/// POST   /check-uuid           -> confirm_exchange
/// DELETE /{id}                 -> delete_exchange
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/request", post(exchange::request_exchange))
        .route("/exchange-request", post(exchange::check_eligibility))
        .route("/incoming", get(exchange::list_incoming))
        .route("/outgoing", get(exchange::list_outgoing))
        .route("/accept", post(exchange::accept_exchange))
        .route("/reject", post(exchange::reject_exchange))
        .route("/check-uuid", post(exchange::confirm_exchange))
        .route("/{id}", delete(exchange::delete_exchange))
}
