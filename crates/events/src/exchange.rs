//! Exchange lifecycle events.

use barter_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::bus::MarketEvent;

/// Published after a completion handshake commits.
pub const EXCHANGE_COMPLETED: &str = "exchange.completed";

/// One side of a completed exchange, with what is needed to address them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeParty {
    pub user_id: DbId,
    pub name: String,
    pub email: String,
}

/// Payload of [`EXCHANGE_COMPLETED`].
///
/// Captured before the items are consumed, so titles survive their deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeCompletedPayload {
    pub exchange_id: DbId,
    pub requested_item_title: String,
    pub offered_item_title: Option<String>,
    pub requester: ExchangeParty,
    pub owner: ExchangeParty,
}

impl ExchangeCompletedPayload {
    /// Wrap the payload in a [`MarketEvent`] attributed to `actor_id`.
    pub fn into_event(self, actor_id: DbId) -> MarketEvent {
        let exchange_id = self.exchange_id;
        let payload = serde_json::to_value(&self).unwrap_or_default();
        MarketEvent::new(EXCHANGE_COMPLETED)
            .for_exchange(exchange_id)
            .by_user(actor_id)
            .with_payload(payload)
    }
}
