//! Driving ports for browsing the gallery and liking photos.

use std::collections::BTreeMap;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, LikeRecord, PhotoId, PhotoRecord};

use super::PhotoFilter;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GalleryQuery: Send + Sync {
    /// Newest-first page of photos.
    async fn list_photos(
        &self,
        filter: &PhotoFilter,
        request: PageRequest,
    ) -> Result<Page<PhotoRecord>, Error>;

    /// Number of photos per main category.
    async fn count_by_category(&self) -> Result<BTreeMap<String, u64>, Error>;

    /// Number of likes per photo.
    async fn like_counts_by_photo(&self) -> Result<BTreeMap<PhotoId, u64>, Error>;

    /// Number of likes per main category of the liked photos.
    async fn like_counts_by_category(&self) -> Result<BTreeMap<String, u64>, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeCommand: Send + Sync {
    /// Record one like by `voter`; repeats accumulate.
    async fn record_like(&self, photo_id: PhotoId, voter: &str) -> Result<LikeRecord, Error>;
}
