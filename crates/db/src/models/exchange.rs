//! Exchange entity model, request DTOs and projections.

use barter_core::error::CoreError;
use barter_core::exchange::ExchangeStatus;
use barter_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::item::ItemSummary;
use crate::models::user::UserSummary;

/// A row from the `exchanges` table.
#[derive(Debug, Clone, FromRow)]
pub struct Exchange {
    pub id: DbId,
    pub requested_item_id: Option<DbId>,
    pub offered_item_id: Option<DbId>,
    pub requester_id: DbId,
    pub owner_id: DbId,
    pub requested_item_title: String,
    pub offered_item_title: Option<String>,
    pub status: String,
    pub completion_token: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Exchange {
    /// Parse the stored status text.
    pub fn status(&self) -> Result<ExchangeStatus, CoreError> {
        self.status.parse()
    }
}

/// DTO for inserting a new `pending` exchange.
#[derive(Debug, Clone)]
pub struct CreateExchange {
    pub requested_item_id: DbId,
    pub offered_item_id: Option<DbId>,
    pub requester_id: DbId,
    pub owner_id: DbId,
    pub requested_item_title: String,
    pub offered_item_title: Option<String>,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Request body for `POST /exchanges/request`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRequest {
    pub requested_item_id: DbId,
    pub offered_item_id: Option<DbId>,
}

/// Request body for `POST /exchanges/exchange-request`.
#[derive(Debug, Clone, Deserialize)]
pub struct EligibilityRequest {
    pub requested_item_id: DbId,
}

/// Request body for `POST /exchanges/accept` and `POST /exchanges/reject`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeDecision {
    pub exchange_id: DbId,
}

/// Request body for `POST /exchanges/check-uuid`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionTokenCheck {
    pub exchange_id: DbId,
    pub exchange_uuid: String,
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// An exchange joined with party names and item categories.
#[derive(Debug, Clone, FromRow)]
pub struct ExchangeListingRow {
    pub id: DbId,
    pub status: String,
    pub completion_token: Option<String>,
    pub requester_id: DbId,
    pub requester_name: String,
    pub owner_id: DbId,
    pub owner_name: String,
    pub requested_item_id: Option<DbId>,
    pub requested_item_title: String,
    pub requested_category_name: Option<String>,
    pub offered_item_id: Option<DbId>,
    pub offered_item_title: Option<String>,
    pub offered_category_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Exchange projection returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeView {
    pub id: DbId,
    pub status: String,
    /// Only present for the owner of the requested item while exchanging.
    pub completion_token: Option<String>,
    pub requester: UserSummary,
    pub owner: UserSummary,
    pub requested_item: ItemSummary,
    pub offered_item: Option<ItemSummary>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ExchangeView {
    /// Build the projection seen by `viewer_id`.
    pub fn for_viewer(row: ExchangeListingRow, viewer_id: DbId) -> Self {
        let completion_token = if viewer_id == row.owner_id {
            row.completion_token
        } else {
            None
        };

        let offered_item = row.offered_item_title.map(|title| ItemSummary {
            id: row.offered_item_id,
            title,
            category: row.offered_category_name,
        });

        Self {
            id: row.id,
            status: row.status,
            completion_token,
            requester: UserSummary {
                id: row.requester_id,
                name: row.requester_name,
            },
            owner: UserSummary {
                id: row.owner_id,
                name: row.owner_name,
            },
            requested_item: ItemSummary {
                id: row.requested_item_id,
                title: row.requested_item_title,
                category: row.requested_category_name,
            },
            offered_item,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
