//! Repository for the `categories` table.

use barter_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{Category, CreateCategory};

const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides create and read operations for item categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!("INSERT INTO categories (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Category>(&query)
            .bind(input.name.trim())
            .fetch_one(pool)
            .await
    }

    /// List all categories, ordered by name ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY name ASC");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Find a category by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Return the subset of `ids` that do not exist, in input order.
    pub async fn find_missing(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        let existing: Vec<DbId> =
            sqlx::query_scalar("SELECT id FROM categories WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(pool)
                .await?;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !existing.contains(id))
            .collect())
    }
}
