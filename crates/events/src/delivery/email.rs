//! Exchange confirmation email via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport. If `SMTP_HOST`
//! is not set, [`EmailConfig::from_env`] returns `None` and no mailer should
//! be constructed.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::notifier::ExchangeNotifier;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

const DEFAULT_SMTP_PORT: u16 = 587;

const DEFAULT_FROM_ADDRESS: &str = "noreply@barter.local";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    /// Defaults to 587 (STARTTLS).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set.
    ///
    /// | Variable         | Required | Default                 |
    /// |------------------|----------|-------------------------|
    /// | `SMTP_HOST`      | yes      |                         |
    /// | `SMTP_PORT`      | no       | `587`                   |
    /// | `SMTP_FROM`      | no       | `noreply@barter.local`  |
    /// | `SMTP_USER`      | no       |                         |
    /// | `SMTP_PASSWORD`  | no       |                         |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Message content
// ---------------------------------------------------------------------------

/// Subject line of the confirmation email.
pub fn confirmation_subject(requested_item_title: &str) -> String {
    format!("[Barter] Exchange completed: {requested_item_title}")
}

/// Plain-text body of the confirmation email.
pub fn confirmation_body(
    recipient_name: &str,
    requested_item_title: &str,
    offered_item_title: Option<&str>,
) -> String {
    let traded = match offered_item_title {
        Some(offered) => format!("\"{requested_item_title}\" was exchanged for \"{offered}\"."),
        None => format!("\"{requested_item_title}\" was handed over as a donation."),
    };
    format!(
        "Hello {recipient_name},\n\n\
         Your exchange has been completed. {traded}\n\n\
         Both items have been removed from the marketplace.\n\n\
         Thank you for using Barter."
    )
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends exchange confirmation emails via SMTP.
///
/// The transport is built once and pools its connections across sends.
pub struct EmailDelivery {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailDelivery {
    /// Build the transport and parse the sender address. No connection is
    /// attempted until the first send.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: config.from_address.parse()?,
        })
    }
}

#[async_trait]
impl ExchangeNotifier for EmailDelivery {
    async fn send_exchange_confirmation(
        &self,
        to_email: &str,
        recipient_name: &str,
        requested_item_title: &str,
        offered_item_title: Option<&str>,
    ) -> Result<(), EmailError> {
        let to = Mailbox::new(Some(recipient_name.to_string()), to_email.parse::<Address>()?);

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(confirmation_subject(requested_item_title))
            .header(ContentType::TEXT_PLAIN)
            .body(confirmation_body(
                recipient_name,
                requested_item_title,
                offered_item_title,
            ))
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.transport.send(email).await?;

        tracing::info!(to = to_email, "Exchange confirmation email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
