//! Handlers for exchange negotiation.
//!
//! All endpoints require authentication via [`AuthUser`]. Mutations return
//! the exchange as the caller is allowed to see it; the completion token is
//! only included for the owner of the requested item.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use barter_core::types::DbId;
use barter_db::models::exchange::{
    CompletionTokenCheck, EligibilityRequest, ExchangeDecision, ExchangeRequest,
};

use crate::error::AppResult;
use crate::marketplace::exchanges;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/exchanges/request
///
/// Request an item, offering one of the caller's items unless it is a
/// donation.
pub async fn request_exchange(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ExchangeRequest>,
) -> AppResult<impl IntoResponse> {
    let created = exchanges::create(&state.pool, auth.user_id, &input).await?;
    let view = exchanges::view(&state.pool, created.id, auth.user_id).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// POST /api/v1/exchanges/exchange-request
///
/// Check whether the caller can request an item and which of their items
/// would qualify as the offer.
pub async fn check_eligibility(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<EligibilityRequest>,
) -> AppResult<impl IntoResponse> {
    let result =
        exchanges::check_eligibility(&state.pool, auth.user_id, input.requested_item_id).await?;

    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/exchanges/incoming
pub async fn list_incoming(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let views = exchanges::incoming(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/exchanges/outgoing
pub async fn list_outgoing(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let views = exchanges::outgoing(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: views }))
}

/// POST /api/v1/exchanges/accept
pub async fn accept_exchange(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ExchangeDecision>,
) -> AppResult<impl IntoResponse> {
    let accepted = exchanges::accept(&state.pool, auth.user_id, input.exchange_id).await?;
    let view = exchanges::view(&state.pool, accepted.id, auth.user_id).await?;

    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/exchanges/reject
pub async fn reject_exchange(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ExchangeDecision>,
) -> AppResult<impl IntoResponse> {
    let rejected = exchanges::reject(&state.pool, auth.user_id, input.exchange_id).await?;
    let view = exchanges::view(&state.pool, rejected.id, auth.user_id).await?;

    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/exchanges/check-uuid
///
/// Submit the completion token. On a match the exchange completes and both
/// items are consumed.
pub async fn confirm_exchange(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CompletionTokenCheck>,
) -> AppResult<impl IntoResponse> {
    let completed = exchanges::confirm(
        &state.pool,
        &state.event_bus,
        auth.user_id,
        input.exchange_id,
        &input.exchange_uuid,
    )
    .await?;
    let view = exchanges::view(&state.pool, completed.id, auth.user_id).await?;

    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/exchanges/{id}
pub async fn delete_exchange(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(exchange_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    exchanges::delete(&state.pool, auth.user_id, exchange_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
