//! PostgreSQL-backed `PhotoRepository` implementation using Diesel ORM.
//!
//! Tags are written twice: as JSON text on the photo row, which is what
//! listings return, and as one `photo_tags` row per tag, which is what the
//! exact-match listing filter queries.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::{PhotoId, PhotoRecord};
use crate::domain::ports::{
    PhotoFilter, PhotoRepository, PhotoRepositoryError, StoredPhotoTags,
};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewPhotoRow, PhotoRow, tag_rows};
use super::pool::{DbPool, PoolError};
use super::schema::{photo_tags, photos};

/// Diesel-backed implementation of the photo repository port.
#[derive(Clone)]
pub struct DieselPhotoRepository {
    pool: DbPool,
}

impl DieselPhotoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PhotoRepositoryError {
    map_basic_pool_error(error, PhotoRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PhotoRepositoryError {
    map_basic_diesel_error(
        error,
        PhotoRepositoryError::query,
        PhotoRepositoryError::connection,
    )
}

/// Photos carrying `tag` exactly, or every photo when no tag is given.
fn filtered(tag: Option<&str>) -> photos::BoxedQuery<'_, Pg> {
    let query = photos::table.into_boxed();
    match tag {
        Some(tag) => query.filter(
            photos::id.eq_any(
                photo_tags::table
                    .filter(photo_tags::tag.eq(tag))
                    .select(photo_tags::photo_id),
            ),
        ),
        None => query,
    }
}

#[async_trait]
impl PhotoRepository for DieselPhotoRepository {
    async fn insert_photo(&self, photo: &PhotoRecord) -> Result<(), PhotoRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let photo_row = NewPhotoRow::from(photo);
        let tag_rows = tag_rows(photo);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(photos::table)
                    .values(&photo_row)
                    .execute(conn)
                    .await?;
                if !tag_rows.is_empty() {
                    diesel::insert_into(photo_tags::table)
                        .values(&tag_rows)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn photos_page(
        &self,
        filter: &PhotoFilter,
        request: PageRequest,
    ) -> Result<Page<PhotoRecord>, PhotoRepositoryError> {
        let tag = filter.tag.as_deref();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered(tag)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<PhotoRow> = filtered(tag)
            .select(PhotoRow::as_select())
            .order_by((photos::uploaded_at.desc(), photos::id.asc()))
            .limit(i64::from(request.limit()))
            .offset(i64::try_from(request.offset()).unwrap_or(i64::MAX))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows.into_iter().map(PhotoRecord::from).collect();
        Ok(Page::new(
            items,
            request,
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    async fn photo_tag_rows(&self) -> Result<Vec<StoredPhotoTags>, PhotoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(uuid::Uuid, String)> = photos::table
            .select((photos::id, photos::tags))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(id, tags)| StoredPhotoTags {
                photo_id: PhotoId::from_uuid(id),
                tags,
            })
            .collect())
    }
}
