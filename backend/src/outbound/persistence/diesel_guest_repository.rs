//! PostgreSQL-backed `GuestRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{GuestRepository, GuestRepositoryError};
use crate::domain::{GuestId, GuestRecord, NewGuest};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{GuestRow, NewGuestRow};
use super::pool::{DbPool, PoolError};
use super::schema::guests;

/// Diesel-backed implementation of the guest repository port.
#[derive(Clone)]
pub struct DieselGuestRepository {
    pool: DbPool,
}

impl DieselGuestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn insert(
        &self,
        guest: &NewGuest,
        principal: Option<GuestId>,
    ) -> Result<GuestRecord, GuestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: GuestRow = diesel::insert_into(guests::table)
            .values(&NewGuestRow::new(guest, principal))
            .returning(GuestRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }
}

fn map_pool_error(error: PoolError) -> GuestRepositoryError {
    map_basic_pool_error(error, GuestRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> GuestRepositoryError {
    map_basic_diesel_error(
        error,
        GuestRepositoryError::query,
        GuestRepositoryError::connection,
    )
}

#[async_trait]
impl GuestRepository for DieselGuestRepository {
    async fn insert_guest(&self, guest: &NewGuest) -> Result<GuestRecord, GuestRepositoryError> {
        self.insert(guest, None).await
    }

    async fn insert_companion(
        &self,
        principal: GuestId,
        companion: &NewGuest,
    ) -> Result<GuestRecord, GuestRepositoryError> {
        self.insert(companion, Some(principal)).await
    }

    async fn list_guests(&self) -> Result<Vec<GuestRecord>, GuestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<GuestRow> = guests::table
            .select(GuestRow::as_select())
            .order_by(guests::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(GuestRecord::from).collect())
    }
}
