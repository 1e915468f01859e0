//! Exchange confirmation dispatch.
//!
//! Runs as a background task. Delivery failures are logged and never reach
//! the request that completed the exchange.

use std::sync::Arc;

use barter_events::{
    ExchangeCompletedPayload, ExchangeNotifier, MarketEvent, EXCHANGE_COMPLETED,
};
use tokio::sync::broadcast;

/// Sends `exchange.completed` confirmations through an [`ExchangeNotifier`].
pub struct ExchangeMailer {
    notifier: Arc<dyn ExchangeNotifier>,
}

impl ExchangeMailer {
    pub fn new(notifier: Arc<dyn ExchangeNotifier>) -> Self {
        Self { notifier }
    }

    /// Run the dispatch loop until the [`EventBus`](barter_events::EventBus)
    /// is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<MarketEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.handle(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Exchange mailer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, exchange mailer shutting down");
                    break;
                }
            }
        }
    }

    /// Handle one event. Events other than `exchange.completed` are ignored.
    pub async fn handle(&self, event: &MarketEvent) {
        if event.event_type != EXCHANGE_COMPLETED {
            return;
        }

        let payload: ExchangeCompletedPayload = match event.payload_as() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    event_type = %event.event_type,
                    "Malformed event payload"
                );
                return;
            }
        };

        for recipient in [&payload.requester, &payload.owner] {
            let result = self
                .notifier
                .send_exchange_confirmation(
                    &recipient.email,
                    &recipient.name,
                    &payload.requested_item_title,
                    payload.offered_item_title.as_deref(),
                )
                .await;

            if let Err(e) = result {
                tracing::error!(
                    error = %e,
                    exchange_id = payload.exchange_id,
                    user_id = recipient.user_id,
                    "Failed to send exchange confirmation",
                );
            }
        }
    }
}
