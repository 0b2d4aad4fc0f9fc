//! Driving ports for RSVP submissions and the guest list.

use async_trait::async_trait;

use crate::domain::{Error, GuestReceipt, GuestRecord, GuestSubmission};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuestCommand: Send + Sync {
    /// Store a principal guest and their companions, announce them and send
    /// the confirmation emails.
    async fn submit(&self, submission: GuestSubmission) -> Result<GuestReceipt, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuestQuery: Send + Sync {
    /// Every stored guest, principals and companions.
    async fn list_guests(&self) -> Result<Vec<GuestRecord>, Error>;
}
