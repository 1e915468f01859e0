//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`MarketEvent`]s. It is
//! shared via `Arc<EventBus>` in the API state; dropping the last handle
//! closes the channel and lets subscribers shut down.

use barter_core::types::DbId;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// A marketplace event, published after the transaction that caused it
/// has committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketEvent {
    /// Dot-separated event name, e.g. `"exchange.completed"`.
    pub event_type: String,
    pub exchange_id: Option<DbId>,
    /// The user whose request triggered the event.
    pub actor_user_id: Option<DbId>,
    /// Event-specific data. See [`MarketEvent::payload_as`].
    pub payload: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl MarketEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            exchange_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Null,
            occurred_at: Utc::now(),
        }
    }

    pub fn for_exchange(mut self, exchange_id: DbId) -> Self {
        self.exchange_id = Some(exchange_id);
        self
    }

    pub fn by_user(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Decode the payload into a typed struct.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }
}

const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out of [`MarketEvent`]s.
///
/// ```rust
/// use barter_events::bus::{EventBus, MarketEvent};
///
/// let bus = EventBus::new(16);
/// let mut rx = bus.subscribe();
///
/// assert_eq!(bus.publish(MarketEvent::new("exchange.completed")), 1);
/// ```
pub struct EventBus {
    sender: broadcast::Sender<MarketEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber.
    ///
    /// Subscribers that fall further behind observe `RecvError::Lagged`
    /// and lose the oldest events.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers, returning how many received it.
    pub fn publish(&self, event: MarketEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!(
                    event_type = %event.event_type,
                    exchange_id = ?event.exchange_id,
                    "No subscribers for event",
                );
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
