//! Exchange negotiation workflows.

use barter_core::eligibility::{self, CandidateItem, EligibilityResult};
use barter_core::error::CoreError;
use barter_core::exchange::{
    self, ExchangeAction, ExchangeStatus, OfferedItem, Party, RequestedItem,
};
use barter_core::handshake;
use barter_core::types::DbId;
use barter_db::models::exchange::{CreateExchange, Exchange, ExchangeRequest, ExchangeView};
use barter_db::models::user::User;
use barter_db::repositories::{ExchangeRepo, ItemRepo, UserRepo};
use barter_events::{EventBus, ExchangeCompletedPayload, ExchangeParty};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::error::AppResult;

fn exchange_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Exchange",
        id,
    }
}

fn item_not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "Item", id }
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

/// Evaluate whether `requester_id` can request `requested_item_id`, and
/// with which of their items.
pub async fn check_eligibility(
    pool: &PgPool,
    requester_id: DbId,
    requested_item_id: DbId,
) -> AppResult<EligibilityResult> {
    let item = ItemRepo::find_by_id(pool, requested_item_id)
        .await?
        .ok_or_else(|| item_not_found(requested_item_id))?;

    let inventory = candidates_for(pool, requester_id, item.is_exchangeable).await?;
    Ok(eligibility::evaluate(
        item.id,
        item.is_exchangeable,
        item.preference(),
        inventory,
    ))
}

/// The requester's inventory as eligibility candidates. Donations need none.
async fn candidates_for(
    executor: impl PgExecutor<'_>,
    requester_id: DbId,
    is_exchangeable: bool,
) -> AppResult<Vec<CandidateItem>> {
    if !is_exchangeable {
        return Ok(Vec::new());
    }
    let rows = ItemRepo::list_candidates(executor, requester_id).await?;
    Ok(rows.into_iter().map(CandidateItem::from).collect())
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Create a `pending` exchange for `requester_id`.
///
/// The offer must pass the same eligibility evaluation that
/// [`check_eligibility`] reports. The requested and offered item rows are
/// locked for the duration of the transaction, which serializes concurrent requests for the same item with
/// each other and with item edits.
pub async fn create(
    pool: &PgPool,
    requester_id: DbId,
    input: &ExchangeRequest,
) -> AppResult<Exchange> {
    let mut tx = pool.begin().await?;

    let mut lock_ids = vec![input.requested_item_id];
    lock_ids.extend(input.offered_item_id);
    let locked = ItemRepo::lock_many(&mut *tx, &lock_ids).await?;

    let requested = locked
        .iter()
        .find(|i| i.id == input.requested_item_id)
        .ok_or_else(|| item_not_found(input.requested_item_id))?;
    let requested_view = RequestedItem {
        id: requested.id,
        owner_id: requested.owner_id,
        is_exchangeable: requested.is_exchangeable,
        preference: requested.preference(),
    };

    let offered_item_id =
        exchange::validate_request(requester_id, &requested_view, input.offered_item_id)?;
    let offered = match offered_item_id {
        Some(offered_id) => {
            let offered = locked
                .iter()
                .find(|i| i.id == offered_id)
                .ok_or_else(|| item_not_found(offered_id))?;
            exchange::validate_offer(
                requester_id,
                &requested_view,
                &OfferedItem {
                    id: offered.id,
                    owner_id: offered.owner_id,
                    category_id: offered.category_id,
                },
            )?;
            Some(offered)
        }
        None => None,
    };

    let inventory = candidates_for(&mut *tx, requester_id, requested.is_exchangeable).await?;
    let eligibility = eligibility::evaluate(
        requested.id,
        requested.is_exchangeable,
        requested.preference(),
        inventory,
    );
    exchange::validate_eligibility(requested.id, offered_item_id, &eligibility)?;

    if let Some(existing) =
        ExchangeRepo::find_active_for_pair(&mut *tx, requester_id, requested.id).await?
    {
        return Err(CoreError::Conflict(format!(
            "Exchange {} for item {} is still {}",
            existing.id, requested.id, existing.status
        ))
        .into());
    }

    let created = ExchangeRepo::create(
        &mut *tx,
        &CreateExchange {
            requested_item_id: requested.id,
            offered_item_id: offered.map(|o| o.id),
            requester_id,
            owner_id: requested.owner_id,
            requested_item_title: requested.title.clone(),
            offered_item_title: offered.map(|o| o.title.clone()),
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        exchange_id = created.id,
        user_id = requester_id,
        requested_item_id = ?created.requested_item_id,
        offered_item_id = ?created.offered_item_id,
        status = %created.status,
        "Exchange requested",
    );

    Ok(created)
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Lock an exchange and check that `actor_id` may apply `action` to it.
///
/// Returns the locked row and its parsed status. Existence is checked
/// before authorization.
async fn lock_for(
    conn: &mut PgConnection,
    actor_id: DbId,
    exchange_id: DbId,
    action: ExchangeAction,
) -> AppResult<(Exchange, ExchangeStatus)> {
    let exchange = ExchangeRepo::lock_by_id(conn, exchange_id)
        .await?
        .ok_or_else(|| exchange_not_found(exchange_id))?;

    let party = Party::of(actor_id, exchange.requester_id, exchange.owner_id);
    exchange::authorize(action, party)?;

    let status = exchange.status()?;
    Ok((exchange, status))
}

/// Accept a pending exchange, issuing a fresh completion token.
pub async fn accept(pool: &PgPool, actor_id: DbId, exchange_id: DbId) -> AppResult<Exchange> {
    let mut tx = pool.begin().await?;

    let (_, status) = lock_for(&mut *tx, actor_id, exchange_id, ExchangeAction::Accept).await?;
    let next = exchange::validate_transition(status, ExchangeAction::Accept)?
        .ok_or_else(|| CoreError::Internal("accept must produce a status".into()))?;

    let token = handshake::generate_token();
    let updated = ExchangeRepo::update_status(&mut *tx, exchange_id, next, Some(&token))
        .await?
        .ok_or_else(|| exchange_not_found(exchange_id))?;

    tx.commit().await?;

    tracing::info!(exchange_id, user_id = actor_id, status = %next, "Exchange accepted");
    Ok(updated)
}

/// Reject a pending exchange.
pub async fn reject(pool: &PgPool, actor_id: DbId, exchange_id: DbId) -> AppResult<Exchange> {
    let mut tx = pool.begin().await?;

    let (_, status) = lock_for(&mut *tx, actor_id, exchange_id, ExchangeAction::Reject).await?;
    let next = exchange::validate_transition(status, ExchangeAction::Reject)?
        .ok_or_else(|| CoreError::Internal("reject must produce a status".into()))?;

    let updated = ExchangeRepo::update_status(&mut *tx, exchange_id, next, None)
        .await?
        .ok_or_else(|| exchange_not_found(exchange_id))?;

    tx.commit().await?;

    tracing::info!(exchange_id, user_id = actor_id, status = %next, "Exchange rejected");
    Ok(updated)
}

/// Finalize an exchange with its completion token.
///
/// Checks run in the order: existence, party membership, status, token.
/// On success both items are consumed, any other active exchange involving
/// them is rejected, both users' completed-exchange counters are bumped, and
/// `exchange.completed` is published once the transaction has committed.
pub async fn confirm(
    pool: &PgPool,
    event_bus: &EventBus,
    actor_id: DbId,
    exchange_id: DbId,
    submitted_token: &str,
) -> AppResult<Exchange> {
    let mut tx = pool.begin().await?;

    // Lock order is items, then exchanges, the same as `create`.
    let snapshot = ExchangeRepo::find_by_id(&mut *tx, exchange_id)
        .await?
        .ok_or_else(|| exchange_not_found(exchange_id))?;
    let available = ItemRepo::lock_many(&mut *tx, &exchange_item_ids(&snapshot)).await?;

    let (exchange, status) =
        lock_for(&mut *tx, actor_id, exchange_id, ExchangeAction::Confirm).await?;
    handshake::verify(status, exchange.completion_token.as_deref(), submitted_token)?;
    let next = exchange::validate_transition(status, ExchangeAction::Confirm)?
        .ok_or_else(|| CoreError::Internal("confirm must produce a status".into()))?;

    let item_ids = exchange_item_ids(&exchange);
    let all_present = item_ids.iter().all(|id| available.iter().any(|i| i.id == *id));
    if exchange.requested_item_id.is_none() || !all_present {
        return Err(CoreError::Conflict(format!(
            "Items of exchange {exchange_id} are no longer available"
        ))
        .into());
    }

    let requester = load_party(&mut *tx, exchange.requester_id).await?;
    let owner = load_party(&mut *tx, exchange.owner_id).await?;

    let competing =
        ExchangeRepo::lock_active_involving(&mut *tx, &item_ids, exchange_id).await?;
    let superseded = ExchangeRepo::reject_many(&mut *tx, &competing).await?;
    let consumed = ItemRepo::delete_many(&mut *tx, &item_ids).await?;
    let completed = ExchangeRepo::update_status(&mut *tx, exchange_id, next, None)
        .await?
        .ok_or_else(|| exchange_not_found(exchange_id))?;
    UserRepo::increment_completed_exchanges(&mut *tx, &[requester.id, owner.id]).await?;

    tx.commit().await?;

    tracing::info!(
        exchange_id,
        user_id = actor_id,
        status = %next,
        items_consumed = consumed,
        superseded = ?superseded,
        "Exchange completed",
    );

    let payload = ExchangeCompletedPayload {
        exchange_id,
        requested_item_title: exchange.requested_item_title,
        offered_item_title: exchange.offered_item_title,
        requester: party(requester),
        owner: party(owner),
    };
    event_bus.publish(payload.into_event(actor_id));

    Ok(completed)
}

/// Hard-delete an exchange that has not completed. Items are untouched.
pub async fn delete(pool: &PgPool, actor_id: DbId, exchange_id: DbId) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let (_, status) = lock_for(&mut *tx, actor_id, exchange_id, ExchangeAction::Delete).await?;
    exchange::validate_transition(status, ExchangeAction::Delete)?;

    ExchangeRepo::delete(&mut *tx, exchange_id).await?;
    tx.commit().await?;

    tracing::info!(exchange_id, user_id = actor_id, status = %status, "Exchange deleted");
    Ok(())
}

async fn load_party(conn: &mut PgConnection, user_id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "User",
                id: user_id,
            }
            .into()
        })
}

fn exchange_item_ids(exchange: &Exchange) -> Vec<DbId> {
    exchange
        .requested_item_id
        .into_iter()
        .chain(exchange.offered_item_id)
        .collect()
}

fn party(user: User) -> ExchangeParty {
    ExchangeParty {
        user_id: user.id,
        name: user.name,
        email: user.email,
    }
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Load an exchange in the form `viewer_id` is allowed to see.
pub async fn view(pool: &PgPool, exchange_id: DbId, viewer_id: DbId) -> AppResult<ExchangeView> {
    let row = ExchangeRepo::find_listing(pool, exchange_id)
        .await?
        .ok_or_else(|| exchange_not_found(exchange_id))?;
    Ok(ExchangeView::for_viewer(row, viewer_id))
}

/// Exchanges on items owned by `user_id`.
pub async fn incoming(pool: &PgPool, user_id: DbId) -> AppResult<Vec<ExchangeView>> {
    let rows = ExchangeRepo::list_incoming(pool, user_id).await?;
    Ok(rows
        .into_iter()
        .map(|row| ExchangeView::for_viewer(row, user_id))
        .collect())
}

/// Exchanges requested by `user_id`.
pub async fn outgoing(pool: &PgPool, user_id: DbId) -> AppResult<Vec<ExchangeView>> {
    let rows = ExchangeRepo::list_outgoing(pool, user_id).await?;
    Ok(rows
        .into_iter()
        .map(|row| ExchangeView::for_viewer(row, user_id))
        .collect())
}
