//! Port for guest persistence.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::{GuestId, GuestRecord, NewGuest};

use super::define_port_error;

define_port_error! {
    /// Errors raised by guest repository adapters.
    pub enum GuestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "guest repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "guest repository query failed: {message}",
    }
}

/// Guest storage. Identifiers are assigned by the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuestRepository: Send + Sync {
    /// Store a principal guest.
    async fn insert_guest(&self, guest: &NewGuest) -> Result<GuestRecord, GuestRepositoryError>;

    /// Store a companion referencing `principal`.
    async fn insert_companion(
        &self,
        principal: GuestId,
        companion: &NewGuest,
    ) -> Result<GuestRecord, GuestRepositoryError>;

    /// Every stored guest, principals and companions, oldest first.
    async fn list_guests(&self) -> Result<Vec<GuestRecord>, GuestRepositoryError>;
}

/// In-memory guest store used when no database is configured and by tests.
#[derive(Debug, Default)]
pub struct FixtureGuestRepository {
    guests: Mutex<Vec<GuestRecord>>,
}

impl FixtureGuestRepository {
    fn push(&self, guest: &NewGuest, principal_id: Option<GuestId>) -> GuestRecord {
        let mut guests = self.guests.lock().unwrap_or_else(PoisonError::into_inner);
        let next = i64::try_from(guests.len()).unwrap_or(i64::MAX - 1) + 1;
        let record = GuestRecord {
            id: GuestId::new(next),
            profile: guest.profile.clone(),
            principal_id,
            responded_at: guest.responded_at,
        };
        guests.push(record.clone());
        record
    }
}

#[async_trait]
impl GuestRepository for FixtureGuestRepository {
    async fn insert_guest(&self, guest: &NewGuest) -> Result<GuestRecord, GuestRepositoryError> {
        Ok(self.push(guest, None))
    }

    async fn insert_companion(
        &self,
        principal: GuestId,
        companion: &NewGuest,
    ) -> Result<GuestRecord, GuestRepositoryError> {
        Ok(self.push(companion, Some(principal)))
    }

    async fn list_guests(&self) -> Result<Vec<GuestRecord>, GuestRepositoryError> {
        Ok(self
            .guests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}
