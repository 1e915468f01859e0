//! Outbound notifications driven by the event bus.
//!
//! [`ExchangeMailer`] subscribes to the bus and sends a confirmation to both
//! parties of every completed exchange.

pub mod mailer;

pub use mailer::ExchangeMailer;
