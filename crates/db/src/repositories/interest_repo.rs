//! Repository for the `user_interests` table.

use barter_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::interest::UserInterest;

const COLUMNS: &str = "id, user_id, category_ids, created_at, updated_at";

/// Persistence for each user's category interests.
pub struct InterestRepo;

impl InterestRepo {
    /// Store `category_ids` as the user's interests, replacing any earlier list.
    pub async fn upsert(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        category_ids: &[DbId],
    ) -> Result<UserInterest, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_interests (user_id, category_ids)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_user_interests_user
             DO UPDATE SET category_ids = EXCLUDED.category_ids
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserInterest>(&query)
            .bind(user_id)
            .bind(category_ids)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_user(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<Option<UserInterest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_interests WHERE user_id = $1");
        sqlx::query_as::<_, UserInterest>(&query)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Find the user's interests and lock the row until the transaction ends.
    pub async fn lock_by_user(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Option<UserInterest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_interests WHERE user_id = $1 FOR UPDATE");
        sqlx::query_as::<_, UserInterest>(&query)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }
}
