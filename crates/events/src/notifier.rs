//! Outbound notification seam.

use async_trait::async_trait;

use crate::delivery::email::EmailError;

/// Delivers exchange confirmations to one recipient.
///
/// Callers treat failures as non-fatal: the exchange has already committed
/// by the time a notifier runs.
#[async_trait]
pub trait ExchangeNotifier: Send + Sync {
    async fn send_exchange_confirmation(
        &self,
        to_email: &str,
        recipient_name: &str,
        requested_item_title: &str,
        offered_item_title: Option<&str>,
    ) -> Result<(), EmailError>;
}
