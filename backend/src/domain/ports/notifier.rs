//! Port for outbound email notifications.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notifier adapters.
    pub enum NotificationError {
        /// The recipient address could not be parsed.
        InvalidRecipient { recipient: String } => "invalid recipient address: {recipient}",
        /// The message could not be assembled.
        Message { message: String } => "email could not be built: {message}",
        /// The transport refused or failed to deliver the message.
        Transport { message: String } => "email transport failed: {message}",
    }
}

/// Plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Email delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError>;
}

/// Notifier that records messages instead of sending them.
#[derive(Debug, Default)]
pub struct FixtureNotifier {
    sent: Mutex<Vec<EmailMessage>>,
}

impl FixtureNotifier {
    /// Messages recorded so far.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Notifier for FixtureNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        Ok(())
    }
}
