//! PostgreSQL-backed `LikeRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::LikeRecord;
use crate::domain::ports::{LikeRepository, LikeRepositoryError};

use super::diesel_helpers::{
    is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{LikeRow, NewLikeRow};
use super::pool::{DbPool, PoolError};
use super::schema::photo_likes;

const PHOTO_FOREIGN_KEY: &str = "photo_likes_photo_id_fkey";

/// Diesel-backed implementation of the like repository port.
#[derive(Clone)]
pub struct DieselLikeRepository {
    pool: DbPool,
}

impl DieselLikeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LikeRepositoryError {
    map_basic_pool_error(error, LikeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LikeRepositoryError {
    map_basic_diesel_error(
        error,
        LikeRepositoryError::query,
        LikeRepositoryError::connection,
    )
}

fn map_insert_error(error: diesel::result::Error, like: &LikeRecord) -> LikeRepositoryError {
    if is_foreign_key_violation(&error, PHOTO_FOREIGN_KEY) {
        LikeRepositoryError::photo_not_found(like.photo_id.to_string())
    } else {
        map_diesel_error(error)
    }
}

#[async_trait]
impl LikeRepository for DieselLikeRepository {
    async fn record_like(&self, like: &LikeRecord) -> Result<(), LikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(photo_likes::table)
            .values(&NewLikeRow {
                photo_id: *like.photo_id.as_uuid(),
                voter_name: &like.voter,
                liked_at: Utc::now(),
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(err, like))
    }

    async fn list_likes(&self) -> Result<Vec<LikeRecord>, LikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LikeRow> = photo_likes::table
            .select(LikeRow::as_select())
            .order_by(photo_likes::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(LikeRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PhotoId;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    fn missing_photo_maps_to_not_found() {
        let like = LikeRecord::new(PhotoId::random(), "Ana").expect("valid like");
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new(format!(
                "insert or update on table \"photo_likes\" violates foreign key constraint \"{PHOTO_FOREIGN_KEY}\""
            )),
        );
        let mapped = map_insert_error(error, &like);
        assert_eq!(
            mapped,
            LikeRepositoryError::photo_not_found(like.photo_id.to_string())
        );
    }

    #[rstest]
    fn other_failures_stay_query_errors() {
        let like = LikeRecord::new(PhotoId::random(), "Ana").expect("valid like");
        let mapped = map_insert_error(DieselError::NotFound, &like);
        assert!(matches!(mapped, LikeRepositoryError::Query { .. }));
    }
}
