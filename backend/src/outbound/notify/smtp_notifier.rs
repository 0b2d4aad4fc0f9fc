//! `lettre` SMTP implementation of the [`Notifier`] port.
//!
//! With an empty host the notifier runs in no-op mode: messages are still
//! built (so bad addresses surface) and then logged instead of sent.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::{Mailbox, Message, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{EmailMessage, NotificationError, Notifier};

/// SMTP relay settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub starttls: bool,
}

/// The notifier could not be configured.
#[derive(Debug, Error)]
pub enum SmtpSetupError {
    #[error("invalid sender address {from}: {message}")]
    Sender { from: String, message: String },
    #[error("failed to configure SMTP transport: {message}")]
    Transport { message: String },
}

/// SMTP notifier, or a logging stand-in when no relay is configured.
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// # Errors
    ///
    /// Returns [`SmtpSetupError`] when the sender address does not parse or
    /// the relay cannot be configured.
    pub fn new(config: &SmtpConfig) -> Result<Self, SmtpSetupError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|err| SmtpSetupError::Sender {
                from: config.from.clone(),
                message: err.to_string(),
            })?;

        let host = config.host.trim();
        let transport = if host.is_empty() {
            info!("SMTP host not configured; notifications run in no-op mode");
            None
        } else {
            let builder = if config.starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            }
            .map_err(|err| SmtpSetupError::Transport {
                message: err.to_string(),
            })?
            .port(config.port);
            let builder = match (&config.username, &config.password) {
                (Some(username), Some(password)) => {
                    builder.credentials(Credentials::new(username.clone(), password.clone()))
                }
                _ => builder,
            };
            Some(Arc::new(builder.build()))
        };

        Ok(Self { transport, from })
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }
}

fn build_message(from: &Mailbox, message: &EmailMessage) -> Result<Message, NotificationError> {
    let to = message
        .recipient
        .parse::<Mailbox>()
        .map_err(|_| NotificationError::invalid_recipient(message.recipient.as_str()))?;
    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(message.subject.as_str())
        .header(header::ContentType::TEXT_PLAIN)
        .body(message.body.clone())
        .map_err(|err| NotificationError::message(err.to_string()))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        let email = build_message(&self.from, message)?;
        match &self.transport {
            Some(transport) => {
                transport
                    .send(email)
                    .await
                    .map_err(|err| NotificationError::transport(err.to_string()))?;
                info!(recipient = %message.recipient, subject = %message.subject, "email sent");
            }
            None => {
                info!(
                    recipient = %message.recipient,
                    subject = %message.subject,
                    "no-op mode; email not sent"
                );
            }
        }
        Ok(())
    }
}
