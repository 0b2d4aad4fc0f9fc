//! Photo ingest: validate, thumbnail, store, persist, announce.
//!
//! Objects are written before the record. A failure after the originals are
//! stored leaves orphaned objects behind, but a record never references an
//! object that was not written.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join;
use mockable::Clock;
use thiserror::Error;
use tracing::{error, info};

use super::fanout::announce_photo;
use super::ports::{
    EventPublisher, ObjectStore, ObjectStoreError, PhotoCommand, PhotoRepository,
    PhotoRepositoryError, StoredObject, ThumbnailError, ThumbnailGenerator,
};
use super::{
    Error, PhotoId, PhotoRecord, PhotoRegistration, PhotoUpload, PhotoValidationError,
    TagList, UploadPolicy, extension_for,
};

/// Failure categories of a photo submission.
#[derive(Debug, Error)]
pub enum PhotoSubmissionError {
    #[error(transparent)]
    Validation(#[from] PhotoValidationError),
    #[error(transparent)]
    Storage(#[from] ObjectStoreError),
    #[error(transparent)]
    Processing(#[from] ThumbnailError),
    #[error(transparent)]
    Persistence(#[from] PhotoRepositoryError),
}

impl From<PhotoSubmissionError> for Error {
    fn from(value: PhotoSubmissionError) -> Self {
        match value {
            PhotoSubmissionError::Validation(err) => match err {
                PhotoValidationError::TooLarge { .. } => Error::payload_too_large(err.to_string()),
                PhotoValidationError::UnsupportedContentType { .. } => {
                    Error::unsupported_media_type(err.to_string())
                }
                other => Error::invalid_request(other.to_string()),
            },
            PhotoSubmissionError::Storage(err) => {
                error!(error = %err, "photo storage failed");
                Error::service_unavailable("photo storage is unavailable")
            }
            PhotoSubmissionError::Processing(err @ ThumbnailError::Decode { .. }) => {
                Error::invalid_request(err.to_string())
            }
            PhotoSubmissionError::Processing(err) => {
                error!(error = %err, "thumbnail generation failed");
                Error::internal(err.to_string())
            }
            PhotoSubmissionError::Persistence(err @ PhotoRepositoryError::Connection { .. }) => {
                error!(error = %err, "photo persistence unavailable");
                Error::service_unavailable("photo database is unavailable")
            }
            PhotoSubmissionError::Persistence(err) => {
                error!(error = %err, "photo persistence failed");
                Error::internal(err.to_string())
            }
        }
    }
}

/// Collaborators of [`PhotoIngestService`].
#[derive(Clone)]
pub struct PhotoIngestPorts {
    pub store: Arc<dyn ObjectStore>,
    pub thumbnails: Arc<dyn ThumbnailGenerator>,
    pub photos: Arc<dyn PhotoRepository>,
    pub publisher: Arc<dyn EventPublisher>,
    pub clock: Arc<dyn Clock>,
}

/// Photo service implementing [`PhotoCommand`].
#[derive(Clone)]
pub struct PhotoIngestService {
    ports: PhotoIngestPorts,
    policy: UploadPolicy,
}

impl PhotoIngestService {
    pub fn new(ports: PhotoIngestPorts, policy: UploadPolicy) -> Self {
        Self { ports, policy }
    }

    /// Run the full binary ingest pipeline.
    pub async fn ingest_upload(
        &self,
        upload: PhotoUpload,
    ) -> Result<PhotoRecord, PhotoSubmissionError> {
        let (tags, metadata) = self.policy.validate(&upload)?;
        let thumbnail = self.ports.thumbnails.derive(upload.content.clone()).await?;

        let id = PhotoId::random();
        let title = upload.title.trim().to_owned();
        let object_metadata = object_metadata(&title, &tags, &self.ports.clock);
        let original = StoredObject {
            key: format!("photos/{id}/original.{}", extension_for(&upload.content_type)),
            bytes: upload.content,
            content_type: upload.content_type,
            metadata: object_metadata.clone(),
        };
        let thumb = StoredObject {
            key: format!("photos/{id}/thumb.jpg"),
            bytes: thumbnail,
            content_type: "image/jpeg".to_owned(),
            metadata: object_metadata,
        };
        let (image_url, image_url_thumb) =
            try_join(self.ports.store.put(original), self.ports.store.put(thumb)).await?;

        self.persist_and_announce(PhotoRecord {
            id,
            image_url,
            image_url_thumb,
            title,
            tags,
            metadata,
            uploaded_at: self.ports.clock.utc(),
        })
        .await
    }

    /// Persist and announce a photo hosted elsewhere.
    pub async fn ingest_registration(
        &self,
        registration: PhotoRegistration,
    ) -> Result<PhotoRecord, PhotoSubmissionError> {
        let image_url = registration.image_url.trim().to_owned();
        if image_url.is_empty() {
            return Err(PhotoValidationError::MissingImageUrl.into());
        }
        let image_url_thumb = registration
            .image_url_thumb
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| image_url.clone());

        self.persist_and_announce(PhotoRecord {
            id: PhotoId::random(),
            image_url,
            image_url_thumb,
            title: registration.title.trim().to_owned(),
            tags: registration.tags,
            metadata: registration.metadata,
            uploaded_at: self.ports.clock.utc(),
        })
        .await
    }

    async fn persist_and_announce(
        &self,
        photo: PhotoRecord,
    ) -> Result<PhotoRecord, PhotoSubmissionError> {
        self.ports.photos.insert_photo(&photo).await?;
        info!(photo_id = %photo.id, tags = photo.tags.as_slice().len(), "photo stored");
        announce_photo(self.ports.publisher.as_ref(), &photo);
        Ok(photo)
    }
}

fn object_metadata(
    title: &str,
    tags: &TagList,
    clock: &Arc<dyn Clock>,
) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("title".to_owned(), title.to_owned()),
        ("tags".to_owned(), tags.to_stored()),
        ("uploaded-at".to_owned(), clock.utc().to_rfc3339()),
    ])
}

#[async_trait]
impl PhotoCommand for PhotoIngestService {
    async fn submit_upload(&self, upload: PhotoUpload) -> Result<PhotoRecord, Error> {
        self.ingest_upload(upload).await.map_err(Error::from)
    }

    async fn register_uploaded(
        &self,
        registration: PhotoRegistration,
    ) -> Result<PhotoRecord, Error> {
        self.ingest_registration(registration)
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "photo_ingest_tests.rs"]
mod tests;
