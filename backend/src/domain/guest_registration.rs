//! RSVP registration: store the principal, announce, store companions, email.
//!
//! Only the principal insert is authoritative. Companion failures are logged
//! and counted but never undo the principal, and emails go out from a detached
//! task whose failures are only logged.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use mockable::Clock;
use thiserror::Error;
use tracing::{error, info, warn};

use super::fanout::announce_guest;
use super::notification::rsvp_emails;
use super::ports::{
    EmailMessage, EventPublisher, GuestCommand, GuestQuery, GuestRepository,
    GuestRepositoryError, Notifier,
};
use super::{
    Confirmation, Error, GuestId, GuestReceipt, GuestRecord, GuestSubmission,
    GuestValidationError, NewGuest, RealtimeEvent, TraceId,
};

/// Failure categories of a guest submission.
#[derive(Debug, Error)]
pub enum GuestSubmissionError {
    #[error(transparent)]
    Validation(#[from] GuestValidationError),
    #[error(transparent)]
    Persistence(#[from] GuestRepositoryError),
}

impl From<GuestSubmissionError> for Error {
    fn from(value: GuestSubmissionError) -> Self {
        match value {
            GuestSubmissionError::Validation(err) => Error::invalid_request(err.to_string()),
            GuestSubmissionError::Persistence(err @ GuestRepositoryError::Connection { .. }) => {
                error!(error = %err, "guest persistence unavailable");
                Error::service_unavailable("guest database is unavailable")
            }
            GuestSubmissionError::Persistence(err) => {
                error!(error = %err, "guest persistence failed");
                Error::internal(err.to_string())
            }
        }
    }
}

/// Guest service implementing [`GuestCommand`] and [`GuestQuery`].
#[derive(Clone)]
pub struct GuestRegistrationService {
    guests: Arc<dyn GuestRepository>,
    notifier: Arc<dyn Notifier>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    operators: Arc<[String]>,
}

impl GuestRegistrationService {
    pub fn new(
        guests: Arc<dyn GuestRepository>,
        notifier: Arc<dyn Notifier>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        operators: Vec<String>,
    ) -> Self {
        Self {
            guests,
            notifier,
            publisher,
            clock,
            operators: operators.into(),
        }
    }

    /// Register a submission and report how many companions were stored.
    pub async fn register(
        &self,
        submission: GuestSubmission,
    ) -> Result<GuestReceipt, GuestSubmissionError> {
        submission.validate()?;
        let responded_at = self.clock.utc();
        let principal_profile = submission.principal_profile();
        let principal = self
            .guests
            .insert_guest(&NewGuest {
                profile: principal_profile.clone(),
                responded_at,
            })
            .await?;
        info!(guest_id = %principal.id, companions = submission.companions.len(), "guest stored");

        self.publisher
            .publish_all(&RealtimeEvent::Confirmation(Confirmation::ok()));
        announce_guest(self.publisher.as_ref(), &principal);

        self.dispatch_emails(rsvp_emails(&submission, &self.operators));

        let companions = submission.companions.iter().map(|companion| NewGuest {
            profile: companion.to_profile(&principal_profile),
            responded_at,
        });
        let saves = companions.map(|companion| self.store_companion(principal.id, companion));
        let outcomes = join_all(saves).await;
        let companions_saved = outcomes.iter().filter(|saved| **saved).count();

        Ok(GuestReceipt {
            id: principal.id,
            companions_saved,
            companion_failures: outcomes.len() - companions_saved,
        })
    }

    async fn store_companion(&self, principal: GuestId, companion: NewGuest) -> bool {
        match self.guests.insert_companion(principal, &companion).await {
            Ok(record) => {
                announce_guest(self.publisher.as_ref(), &record);
                true
            }
            Err(err) => {
                warn!(
                    guest_id = %principal,
                    companion = %companion.profile.full_name,
                    error = %err,
                    "companion could not be stored"
                );
                false
            }
        }
    }

    fn dispatch_emails(&self, messages: Vec<EmailMessage>) {
        if messages.is_empty() {
            return;
        }
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(TraceId::inherit(send_all(notifier, messages)));
    }

    /// Every stored guest.
    pub async fn guests(&self) -> Result<Vec<GuestRecord>, GuestSubmissionError> {
        Ok(self.guests.list_guests().await?)
    }
}

/// Send every message concurrently, logging each outcome.
async fn send_all(notifier: Arc<dyn Notifier>, messages: Vec<EmailMessage>) {
    let sends = messages.iter().map(|message| {
        let notifier = Arc::clone(&notifier);
        async move {
            match notifier.send(message).await {
                Ok(()) => info!(recipient = %message.recipient, "rsvp email sent"),
                Err(err) => {
                    error!(recipient = %message.recipient, error = %err, "rsvp email failed");
                }
            }
        }
    });
    join_all(sends).await;
}

#[async_trait]
impl GuestCommand for GuestRegistrationService {
    async fn submit(&self, submission: GuestSubmission) -> Result<GuestReceipt, Error> {
        self.register(submission).await.map_err(Error::from)
    }
}

#[async_trait]
impl GuestQuery for GuestRegistrationService {
    async fn list_guests(&self) -> Result<Vec<GuestRecord>, Error> {
        self.guests().await.map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "guest_registration_tests.rs"]
mod tests;
