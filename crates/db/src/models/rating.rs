//! User rating model and DTOs.

use barter_core::types::{DbId, Score, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ratings` table. One row per (rated user, rater).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rating {
    pub id: DbId,
    pub user_id: DbId,
    pub rater_id: DbId,
    pub score: Score,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /users/{user_id}/ratings`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRating {
    pub score: Score,
}
