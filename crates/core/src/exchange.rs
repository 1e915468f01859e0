//! Exchange negotiation state machine.
//!
//! An exchange request moves through:
//!
//! ```text
//! pending ──accept──> exchanging ──confirm──> completed
//!    │
//!    └──reject──> rejected
//! ```
//!
//! `delete` is an exit rather than a state: it removes the record from any
//! status except `completed`. Every transition is also gated by which party
//! is acting, see [`authorize`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::eligibility::{qualifies, CategoryPreference, EligibilityResult};
use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_EXCHANGING: &str = "exchanging";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_REJECTED: &str = "rejected";

/// Statuses in which an exchange still holds a claim on its items.
pub const ACTIVE_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_EXCHANGING];

/// Lifecycle status of an exchange, stored as text in `exchanges.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeStatus {
    Pending,
    Exchanging,
    Completed,
    Rejected,
}

impl ExchangeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Exchanging => STATUS_EXCHANGING,
            Self::Completed => STATUS_COMPLETED,
            Self::Rejected => STATUS_REJECTED,
        }
    }

    /// `pending` and `exchanging` exchanges are active; the others are terminal.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Exchanging)
    }
}

impl fmt::Display for ExchangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_EXCHANGING => Ok(Self::Exchanging),
            STATUS_COMPLETED => Ok(Self::Completed),
            STATUS_REJECTED => Ok(Self::Rejected),
            other => Err(CoreError::Internal(format!(
                "Unknown exchange status '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Actions and parties
// ---------------------------------------------------------------------------

/// An operation applied to an existing exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeAction {
    Accept,
    Reject,
    Confirm,
    Delete,
}

impl ExchangeAction {
    pub fn verb(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Confirm => "confirm",
            Self::Delete => "delete",
        }
    }
}

/// The relationship of an acting user to an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    /// The user who asked for the item.
    Requester,
    /// The owner of the requested item.
    Owner,
    /// Anyone else.
    Outsider,
}

impl Party {
    pub fn of(actor_id: DbId, requester_id: DbId, owner_id: DbId) -> Self {
        if actor_id == owner_id {
            Party::Owner
        } else if actor_id == requester_id {
            Party::Requester
        } else {
            Party::Outsider
        }
    }
}

/// Check that `party` may perform `action`.
///
/// Accept and reject belong to the owner of the requested item. Confirm and
/// delete may come from either side of the exchange.
pub fn authorize(action: ExchangeAction, party: Party) -> Result<(), CoreError> {
    let allowed = match action {
        ExchangeAction::Accept | ExchangeAction::Reject => party == Party::Owner,
        ExchangeAction::Confirm | ExchangeAction::Delete => party != Party::Outsider,
    };
    if allowed {
        return Ok(());
    }
    let who = match action {
        ExchangeAction::Accept | ExchangeAction::Reject => "the owner of the requested item",
        ExchangeAction::Confirm | ExchangeAction::Delete => "a party to the exchange",
    };
    Err(CoreError::Forbidden(format!(
        "Only {who} can {} this exchange",
        action.verb()
    )))
}

/// Apply `action` to an exchange in status `current`.
///
/// Returns the status the exchange moves to, or `None` when the action
/// removes the record (`delete`). Fails with [`CoreError::InvalidState`]
/// when the action is not legal from `current`.
pub fn validate_transition(
    current: ExchangeStatus,
    action: ExchangeAction,
) -> Result<Option<ExchangeStatus>, CoreError> {
    use ExchangeAction::*;
    use ExchangeStatus::*;

    match (current, action) {
        (Pending, Accept) => Ok(Some(Exchanging)),
        (Pending, Reject) => Ok(Some(Rejected)),
        (Exchanging, Confirm) => Ok(Some(Completed)),
        (Pending | Exchanging | Rejected, Delete) => Ok(None),
        _ => Err(CoreError::InvalidState(format!(
            "Cannot {} an exchange that is {current}",
            action.verb()
        ))),
    }
}

// ---------------------------------------------------------------------------
// Creation guards
// ---------------------------------------------------------------------------

/// The requested item, as seen by [`validate_request`].
#[derive(Debug, Clone, Copy)]
pub struct RequestedItem<'a> {
    pub id: DbId,
    pub owner_id: DbId,
    pub is_exchangeable: bool,
    pub preference: CategoryPreference<'a>,
}

/// A candidate offered item, as seen by [`validate_offer`].
#[derive(Debug, Clone, Copy)]
pub struct OfferedItem {
    pub id: DbId,
    pub owner_id: DbId,
    pub category_id: DbId,
}

/// Validate the shape of a new exchange request.
///
/// Returns the offered item id that should be persisted: the supplied one
/// for exchangeable items, and always `None` for donations.
pub fn validate_request(
    requester_id: DbId,
    requested: &RequestedItem<'_>,
    offered_item_id: Option<DbId>,
) -> Result<Option<DbId>, CoreError> {
    if requester_id == requested.owner_id {
        return Err(CoreError::Forbidden(
            "You cannot exchange your own item".to_string(),
        ));
    }

    if !requested.is_exchangeable {
        return Ok(None);
    }

    match offered_item_id {
        None => Err(CoreError::Validation(format!(
            "Item {} is only available in exchange; offered_item_id is required",
            requested.id
        ))),
        Some(id) if id == requested.id => Err(CoreError::Validation(
            "An item cannot be offered in exchange for itself".to_string(),
        )),
        Some(id) => Ok(Some(id)),
    }
}

/// Validate that `offered` is an acceptable offer from `requester_id`.
///
/// The requester must own the offered item and its category must be one the
/// requested item's owner accepts.
pub fn validate_offer(
    requester_id: DbId,
    requested: &RequestedItem<'_>,
    offered: &OfferedItem,
) -> Result<(), CoreError> {
    if offered.owner_id != requester_id {
        return Err(CoreError::Validation(format!(
            "Item {} is not owned by the requester",
            offered.id
        )));
    }
    if !qualifies(offered.category_id, requested.preference.preferred_category_ids) {
        return Err(CoreError::Validation(format!(
            "Item {} is not in a category accepted for item {}",
            offered.id, requested.id
        )));
    }
    Ok(())
}

/// Check an offer against the requester's evaluated inventory.
///
/// Beyond the per-item category check in [`validate_offer`], an item with
/// `require_all_categories` only accepts offers from requesters whose
/// inventory covers every preferred category.
pub fn validate_eligibility(
    requested_item_id: DbId,
    offered_item_id: Option<DbId>,
    eligibility: &EligibilityResult,
) -> Result<(), CoreError> {
    if !eligibility.can_exchange {
        return Err(CoreError::Validation(format!(
            "Your items do not cover the categories required for item {requested_item_id} \
             (missing: {:?})",
            eligibility.missing_category_ids
        )));
    }

    match offered_item_id {
        Some(id) if !eligibility.matching_items.iter().any(|m| m.id == id) => {
            Err(CoreError::Validation(format!(
                "Item {id} is not an eligible offer for item {requested_item_id}"
            )))
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
