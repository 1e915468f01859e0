//! Barter event bus and notification infrastructure.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`MarketEvent`] -- the domain event envelope.
//! - [`ExchangeCompletedPayload`] -- typed payload of `exchange.completed`.
//! - [`ExchangeNotifier`] -- the seam through which confirmations leave the
//!   process; [`EmailDelivery`] is the SMTP implementation.

pub mod bus;
pub mod delivery;
pub mod exchange;
pub mod notifier;

pub use bus::{EventBus, MarketEvent};
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use exchange::{ExchangeCompletedPayload, ExchangeParty, EXCHANGE_COMPLETED};
pub use notifier::ExchangeNotifier;
