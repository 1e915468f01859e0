//! Customer interest model and request bodies.

use barter_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `user_interests` table. At most one per user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserInterest {
    pub id: DbId,
    pub user_id: DbId,
    pub category_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /customer-interest`. Replaces the whole list.
#[derive(Debug, Clone, Deserialize)]
pub struct SetInterests {
    pub category_ids: Vec<DbId>,
}

/// Request body for `PUT /customer-interest`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditInterests {
    #[serde(default)]
    pub add_category_ids: Vec<DbId>,
    #[serde(default)]
    pub remove_category_ids: Vec<DbId>,
}
