//! Item category model and DTOs.

use barter_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
}

/// Category reference embedded in item projections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub id: DbId,
    pub name: String,
}
