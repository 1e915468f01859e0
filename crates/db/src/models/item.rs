//! Item entity model, DTOs and projections.

use barter_core::eligibility::{CandidateItem, CategoryPreference};
use barter_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::category::CategoryInfo;
use crate::models::user::UserSummary;

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub owner_id: DbId,
    pub category_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub is_exchangeable: bool,
    pub require_all_categories: bool,
    pub preferred_category_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Item {
    /// The category preferences the owner attached to this item.
    pub fn preference(&self) -> CategoryPreference<'_> {
        CategoryPreference {
            preferred_category_ids: &self.preferred_category_ids,
            require_all_categories: self.require_all_categories,
        }
    }
}

/// DTO for listing a new item. The owner is always the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub category_id: DbId,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_exchangeable: bool,
    #[serde(default)]
    pub require_all_categories: bool,
    #[serde(default)]
    pub preferred_category_ids: Vec<DbId>,
}

/// DTO for updating an item. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItem {
    pub category_id: Option<DbId>,
    pub title: Option<String>,
    /// `Some("")` clears the description.
    pub description: Option<String>,
    pub is_exchangeable: Option<bool>,
    pub require_all_categories: Option<bool>,
    pub preferred_category_ids: Option<Vec<DbId>>,
}

/// An item joined with its category and owner names.
#[derive(Debug, Clone, FromRow)]
pub struct ItemDetailRow {
    pub id: DbId,
    pub owner_id: DbId,
    pub owner_name: String,
    pub category_id: DbId,
    pub category_name: String,
    pub title: String,
    pub description: Option<String>,
    pub is_exchangeable: bool,
    pub require_all_categories: bool,
    pub preferred_category_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Item projection returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub is_exchangeable: bool,
    pub require_all_categories: bool,
    pub preferred_category_ids: Vec<DbId>,
    pub category: CategoryInfo,
    pub owner: UserSummary,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ItemDetailRow> for ItemView {
    fn from(row: ItemDetailRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            is_exchangeable: row.is_exchangeable,
            require_all_categories: row.require_all_categories,
            preferred_category_ids: row.preferred_category_ids,
            category: CategoryInfo {
                id: row.category_id,
                name: row.category_name,
            },
            owner: UserSummary {
                id: row.owner_id,
                name: row.owner_name,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// One of a user's items with its category name, as input to eligibility.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub id: DbId,
    pub title: String,
    pub category_id: DbId,
    pub category_name: String,
}

impl From<CandidateRow> for CandidateItem {
    fn from(row: CandidateRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            category_id: row.category_id,
            category_name: row.category_name,
        }
    }
}

/// Reference to an item embedded in exchange projections.
///
/// `id` is `None` once a completed exchange has consumed the item; the
/// title is kept as a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSummary {
    pub id: Option<DbId>,
    pub title: String,
    pub category: Option<String>,
}
