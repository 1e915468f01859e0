//! Repository for the `users` table.

use barter_core::rating::RatingAggregate;
use barter_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, rating, rating_count, exchange_complete_count, \
                       created_at, updated_at";

/// Provides lookups and aggregate maintenance for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a user by ID and lock the row until the transaction ends.
    pub async fn lock_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Overwrite the stored rating mean and count.
    pub async fn set_rating_aggregate(
        executor: impl PgExecutor<'_>,
        id: DbId,
        aggregate: &RatingAggregate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET rating = $2, rating_count = $3 WHERE id = $1")
            .bind(id)
            .bind(aggregate.rating)
            .bind(aggregate.rating_count)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Increment `exchange_complete_count` for every user in `ids`.
    pub async fn increment_completed_exchanges(
        executor: impl PgExecutor<'_>,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET exchange_complete_count = exchange_complete_count + 1
             WHERE id = ANY($1)",
        )
        .bind(ids)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
