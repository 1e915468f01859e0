//! Repository for the `items` table.

use barter_core::exchange::ACTIVE_STATUSES;
use barter_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::item::{CandidateRow, CreateItem, Item, ItemDetailRow, UpdateItem};

const COLUMNS: &str = "id, owner_id, category_id, title, description, is_exchangeable, \
                       require_all_categories, preferred_category_ids, created_at, updated_at";

/// Columns for [`ItemDetailRow`], over `items i` joined with `users u` and
/// `categories c`.
const DETAIL_COLUMNS: &str = "i.id, i.owner_id, u.name AS owner_name, i.category_id, \
                              c.name AS category_name, i.title, i.description, \
                              i.is_exchangeable, i.require_all_categories, \
                              i.preferred_category_ids, i.created_at, i.updated_at";

const DETAIL_FROM: &str = "items i \
                           JOIN users u ON u.id = i.owner_id \
                           JOIN categories c ON c.id = i.category_id";

/// Provides CRUD and eligibility lookups for listed items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item owned by `owner_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateItem,
    ) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items
                (owner_id, category_id, title, description, is_exchangeable,
                 require_all_categories, preferred_category_ids)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(owner_id)
            .bind(input.category_id)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.is_exchangeable)
            .bind(input.require_all_categories)
            .bind(&input.preferred_category_ids)
            .fetch_one(pool)
            .await
    }

    /// Find an item by ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find an item by ID and lock its row until the transaction ends.
    pub async fn lock_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Lock every item in `ids` until the transaction ends.
    ///
    /// Rows are locked in ascending id order so concurrent callers locking
    /// overlapping sets cannot deadlock. Missing ids are simply absent from
    /// the result.
    pub async fn lock_many(conn: &mut PgConnection, ids: &[DbId]) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items WHERE id = ANY($1) ORDER BY id FOR UPDATE"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(ids)
            .fetch_all(conn)
            .await
    }

    /// Find an item with its owner and category names.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<ItemDetailRow>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} WHERE i.id = $1");
        sqlx::query_as::<_, ItemDetailRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every item, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ItemDetailRow>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} ORDER BY i.created_at DESC, i.id DESC"
        );
        sqlx::query_as::<_, ItemDetailRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// List the items owned by `owner_id`, newest first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<ItemDetailRow>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM}
             WHERE i.owner_id = $1
             ORDER BY i.created_at DESC, i.id DESC"
        );
        sqlx::query_as::<_, ItemDetailRow>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// The owner's inventory as eligibility candidates, oldest first.
    pub async fn list_candidates(
        executor: impl PgExecutor<'_>,
        owner_id: DbId,
    ) -> Result<Vec<CandidateRow>, sqlx::Error> {
        sqlx::query_as::<_, CandidateRow>(
            "SELECT i.id, i.title, i.category_id, c.name AS category_name
             FROM items i
             JOIN categories c ON c.id = i.category_id
             WHERE i.owner_id = $1
             ORDER BY i.id ASC",
        )
        .bind(owner_id)
        .fetch_all(executor)
        .await
    }

    /// Update an item. Only non-`None` fields in `input` are applied; a blank
    /// `description` clears the stored one.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: DbId,
        input: &UpdateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                category_id = COALESCE($2, category_id),
                title = COALESCE($3, title),
                description = CASE WHEN $4::TEXT IS NULL THEN description
                                   ELSE NULLIF(BTRIM($4), '') END,
                is_exchangeable = COALESCE($5, is_exchangeable),
                require_all_categories = COALESCE($6, require_all_categories),
                preferred_category_ids = COALESCE($7, preferred_category_ids)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(input.category_id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.is_exchangeable)
            .bind(input.require_all_categories)
            .bind(&input.preferred_category_ids)
            .fetch_optional(executor)
            .await
    }

    /// Delete an item by ID. Returns `true` if a row was removed.
    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every item in `ids`, returning the number of rows removed.
    pub async fn delete_many(
        executor: impl PgExecutor<'_>,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = ANY($1)")
            .bind(ids)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Whether the item is the requested or offered item of any active exchange.
    pub async fn has_active_exchange(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM exchanges
                WHERE (requested_item_id = $1 OR offered_item_id = $1)
                  AND status = ANY($2)
             )",
        )
        .bind(id)
        .bind(ACTIVE_STATUSES)
        .fetch_one(executor)
        .await
    }
}
