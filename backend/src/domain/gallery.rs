//! Read side of the gallery: listings, category statistics and likes.
//!
//! Statistics are folded in memory from the raw tag text of every photo, so a
//! malformed row is skipped instead of failing the whole aggregate.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::{error, warn};

use super::ports::{
    GalleryQuery, LikeCommand, LikeRepository, LikeRepositoryError, PhotoFilter,
    PhotoRepository, PhotoRepositoryError, StoredPhotoTags,
};
use super::{Error, LikeRecord, PhotoId, PhotoRecord, TagList, like};

/// Gallery service implementing [`GalleryQuery`] and [`LikeCommand`].
#[derive(Clone)]
pub struct GalleryService {
    photos: Arc<dyn PhotoRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl GalleryService {
    pub fn new(photos: Arc<dyn PhotoRepository>, likes: Arc<dyn LikeRepository>) -> Self {
        Self { photos, likes }
    }

    async fn decoded_tags(&self) -> Result<HashMap<PhotoId, TagList>, Error> {
        let rows = self.photos.photo_tag_rows().await.map_err(map_photo_error)?;
        Ok(decode_rows(rows).collect())
    }
}

/// Decode stored tag rows, skipping (and logging) malformed ones.
fn decode_rows(rows: Vec<StoredPhotoTags>) -> impl Iterator<Item = (PhotoId, TagList)> {
    rows.into_iter()
        .filter_map(|row| match TagList::from_stored(&row.tags) {
            Ok(tags) => Some((row.photo_id, tags)),
            Err(err) => {
                warn!(photo_id = %row.photo_id, error = %err, "skipping malformed tag row");
                None
            }
        })
}

/// Number of photos per main category.
///
/// A photo tagged `ceremony/vows` and `ceremony/rings` counts twice towards
/// `ceremony`, once per tag.
pub fn fold_category_counts(rows: Vec<StoredPhotoTags>) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for (_, tags) in decode_rows(rows) {
        for category in tags.main_categories() {
            *counts.entry(category.to_owned()).or_default() += 1;
        }
    }
    counts
}

fn map_photo_error(err: PhotoRepositoryError) -> Error {
    match err {
        PhotoRepositoryError::Connection { .. } => {
            error!(error = %err, "photo repository unavailable");
            Error::service_unavailable("photo database is unavailable")
        }
        PhotoRepositoryError::Query { .. } => {
            error!(error = %err, "photo repository query failed");
            Error::internal(err.to_string())
        }
    }
}

fn map_like_error(err: LikeRepositoryError) -> Error {
    match err {
        LikeRepositoryError::PhotoNotFound { .. } => Error::not_found(err.to_string()),
        LikeRepositoryError::Connection { .. } => {
            error!(error = %err, "like repository unavailable");
            Error::service_unavailable("like database is unavailable")
        }
        LikeRepositoryError::Query { .. } => {
            error!(error = %err, "like repository query failed");
            Error::internal(err.to_string())
        }
    }
}

#[async_trait]
impl GalleryQuery for GalleryService {
    async fn list_photos(
        &self,
        filter: &PhotoFilter,
        request: PageRequest,
    ) -> Result<Page<PhotoRecord>, Error> {
        self.photos
            .photos_page(filter, request)
            .await
            .map_err(map_photo_error)
    }

    async fn count_by_category(&self) -> Result<BTreeMap<String, u64>, Error> {
        let rows = self.photos.photo_tag_rows().await.map_err(map_photo_error)?;
        Ok(fold_category_counts(rows))
    }

    async fn like_counts_by_photo(&self) -> Result<BTreeMap<PhotoId, u64>, Error> {
        let likes = self.likes.list_likes().await.map_err(map_like_error)?;
        Ok(like::count_by_photo(&likes))
    }

    async fn like_counts_by_category(&self) -> Result<BTreeMap<String, u64>, Error> {
        let likes = self.likes.list_likes().await.map_err(map_like_error)?;
        let tags = self.decoded_tags().await?;
        Ok(like::count_by_category(&likes, &tags))
    }
}

#[async_trait]
impl LikeCommand for GalleryService {
    async fn record_like(&self, photo_id: PhotoId, voter: &str) -> Result<LikeRecord, Error> {
        let like = LikeRecord::new(photo_id, voter)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.likes.record_like(&like).await.map_err(map_like_error)?;
        Ok(like)
    }
}
