//! Port for photo persistence and the raw rows behind gallery statistics.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{PhotoId, PhotoRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by photo repository adapters.
    pub enum PhotoRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "photo repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "photo repository query failed: {message}",
    }
}

/// Listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoFilter {
    /// Exact match against any of the photo's tags.
    pub tag: Option<String>,
}

/// Raw tag column of one photo, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhotoTags {
    pub photo_id: PhotoId,
    pub tags: String,
}

/// Photo storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Store a photo together with its tag index.
    async fn insert_photo(&self, photo: &PhotoRecord) -> Result<(), PhotoRepositoryError>;

    /// Newest-first page of photos matching `filter`.
    ///
    /// Rows with malformed tag or metadata text are returned with empty
    /// collections rather than failing the page.
    async fn photos_page(
        &self,
        filter: &PhotoFilter,
        request: PageRequest,
    ) -> Result<Page<PhotoRecord>, PhotoRepositoryError>;

    /// Tag text of every stored photo, undecoded.
    async fn photo_tag_rows(&self) -> Result<Vec<StoredPhotoTags>, PhotoRepositoryError>;
}

/// In-memory photo store used when no database is configured and by tests.
#[derive(Debug, Default)]
pub struct FixturePhotoRepository {
    photos: Mutex<Vec<PhotoRecord>>,
}

#[async_trait]
impl PhotoRepository for FixturePhotoRepository {
    async fn insert_photo(&self, photo: &PhotoRecord) -> Result<(), PhotoRepositoryError> {
        self.photos
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(photo.clone());
        Ok(())
    }

    async fn photos_page(
        &self,
        filter: &PhotoFilter,
        request: PageRequest,
    ) -> Result<Page<PhotoRecord>, PhotoRepositoryError> {
        let mut matching: Vec<PhotoRecord> = self
            .photos
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|photo| match filter.tag.as_deref() {
                Some(tag) => photo.tags.iter().any(|candidate| candidate == tag),
                None => true,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        let total = matching.len() as u64;
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(skip)
            .take(request.limit() as usize)
            .collect();
        Ok(Page::new(items, request, total))
    }

    async fn photo_tag_rows(&self) -> Result<Vec<StoredPhotoTags>, PhotoRepositoryError> {
        Ok(self
            .photos
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|photo| StoredPhotoTags {
                photo_id: photo.id,
                tags: photo.tags.to_stored(),
            })
            .collect())
    }
}
