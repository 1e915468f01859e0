//! Repository for the `exchanges` table.
//!
//! Status transitions are validated in `barter_core::exchange`; this module
//! only persists their outcome. Callers that mutate an exchange should first
//! take the row lock with [`ExchangeRepo::lock_by_id`] inside a transaction.

use barter_core::exchange::{ExchangeStatus, ACTIVE_STATUSES};
use barter_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::exchange::{CreateExchange, Exchange, ExchangeListingRow};

const COLUMNS: &str = "id, requested_item_id, offered_item_id, requester_id, owner_id, \
                       requested_item_title, offered_item_title, status, completion_token, \
                       created_at, updated_at";

/// Columns for [`ExchangeListingRow`]. Items may already have been consumed,
/// so their categories come from outer joins.
const LISTING_SELECT: &str = "SELECT e.id, e.status, e.completion_token, \
        e.requester_id, ru.name AS requester_name, \
        e.owner_id, ou.name AS owner_name, \
        e.requested_item_id, e.requested_item_title, rc.name AS requested_category_name, \
        e.offered_item_id, e.offered_item_title, oc.name AS offered_category_name, \
        e.created_at, e.updated_at \
     FROM exchanges e \
     JOIN users ru ON ru.id = e.requester_id \
     JOIN users ou ON ou.id = e.owner_id \
     LEFT JOIN items ri ON ri.id = e.requested_item_id \
     LEFT JOIN categories rc ON rc.id = ri.category_id \
     LEFT JOIN items oi ON oi.id = e.offered_item_id \
     LEFT JOIN categories oc ON oc.id = oi.category_id";

/// Provides persistence for exchange requests.
pub struct ExchangeRepo;

impl ExchangeRepo {
    /// Insert a new `pending` exchange, returning the created row.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateExchange,
    ) -> Result<Exchange, sqlx::Error> {
        let query = format!(
            "INSERT INTO exchanges
                (requested_item_id, offered_item_id, requester_id, owner_id,
                 requested_item_title, offered_item_title, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Exchange>(&query)
            .bind(input.requested_item_id)
            .bind(input.offered_item_id)
            .bind(input.requester_id)
            .bind(input.owner_id)
            .bind(&input.requested_item_title)
            .bind(&input.offered_item_title)
            .bind(ExchangeStatus::Pending.as_str())
            .fetch_one(executor)
            .await
    }

    /// Find an exchange by ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Exchange>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM exchanges WHERE id = $1");
        sqlx::query_as::<_, Exchange>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find an exchange by ID and lock its row until the transaction ends.
    ///
    /// A concurrent caller blocks here and then observes the committed
    /// status, so two transitions on the same exchange always serialize.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Exchange>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM exchanges WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Exchange>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find the active (`pending` or `exchanging`) exchange for a
    /// requester and requested item, if any.
    pub async fn find_active_for_pair(
        executor: impl PgExecutor<'_>,
        requester_id: DbId,
        requested_item_id: DbId,
    ) -> Result<Option<Exchange>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM exchanges
             WHERE requester_id = $1 AND requested_item_id = $2 AND status = ANY($3)"
        );
        sqlx::query_as::<_, Exchange>(&query)
            .bind(requester_id)
            .bind(requested_item_id)
            .bind(ACTIVE_STATUSES)
            .fetch_optional(executor)
            .await
    }

    /// Persist a new status together with its completion token.
    ///
    /// `token` must be `Some` exactly when `status` is `exchanging`; the
    /// table's check constraint rejects anything else.
    pub async fn update_status(
        executor: impl PgExecutor<'_>,
        id: DbId,
        status: ExchangeStatus,
        token: Option<&str>,
    ) -> Result<Option<Exchange>, sqlx::Error> {
        let query = format!(
            "UPDATE exchanges SET status = $2, completion_token = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Exchange>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(token)
            .fetch_optional(executor)
            .await
    }

    /// Lock every other active exchange that references one of `item_ids`,
    /// in ascending id order. Returns the locked exchange ids.
    pub async fn lock_active_involving(
        conn: &mut PgConnection,
        item_ids: &[DbId],
        except_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM exchanges
             WHERE id <> $1
               AND status = ANY($2)
               AND (requested_item_id = ANY($3) OR offered_item_id = ANY($3))
             ORDER BY id
             FOR UPDATE",
        )
        .bind(except_id)
        .bind(ACTIVE_STATUSES)
        .bind(item_ids)
        .fetch_all(conn)
        .await
    }

    /// Move the given exchanges to `rejected` and clear their tokens.
    /// Exchanges that are no longer active are left alone. Returns the ids
    /// actually rejected.
    pub async fn reject_many(
        executor: impl PgExecutor<'_>,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE exchanges SET status = $1, completion_token = NULL
             WHERE id = ANY($2) AND status = ANY($3)
             RETURNING id",
        )
        .bind(ExchangeStatus::Rejected.as_str())
        .bind(ids)
        .bind(ACTIVE_STATUSES)
        .fetch_all(executor)
        .await
    }

    /// Hard-delete an exchange. Referenced items are untouched.
    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM exchanges WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Exchanges for items owned by `owner_id`, newest first.
    pub async fn list_incoming(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<ExchangeListingRow>, sqlx::Error> {
        let query = format!(
            "{LISTING_SELECT} WHERE e.owner_id = $1 ORDER BY e.created_at DESC, e.id DESC"
        );
        sqlx::query_as::<_, ExchangeListingRow>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Exchanges requested by `requester_id`, newest first.
    pub async fn list_outgoing(
        pool: &PgPool,
        requester_id: DbId,
    ) -> Result<Vec<ExchangeListingRow>, sqlx::Error> {
        let query = format!(
            "{LISTING_SELECT} WHERE e.requester_id = $1 ORDER BY e.created_at DESC, e.id DESC"
        );
        sqlx::query_as::<_, ExchangeListingRow>(&query)
            .bind(requester_id)
            .fetch_all(pool)
            .await
    }

    /// A single exchange in listing form.
    pub async fn find_listing(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<ExchangeListingRow>, sqlx::Error> {
        let query = format!("{LISTING_SELECT} WHERE e.id = $1");
        sqlx::query_as::<_, ExchangeListingRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
