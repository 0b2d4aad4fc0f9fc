//! Driving port for adding photos to the gallery.
//!
//! Inbound adapters (the upload form, the JSON endpoint and the realtime
//! channel) use this port without knowing about storage or fan-out.

use async_trait::async_trait;

use crate::domain::{Error, PhotoRecord, PhotoRegistration, PhotoUpload};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoCommand: Send + Sync {
    /// Store an uploaded image and its thumbnail, persist the record and
    /// announce it to live subscribers.
    async fn submit_upload(&self, upload: PhotoUpload) -> Result<PhotoRecord, Error>;

    /// Persist and announce a photo whose image is already hosted elsewhere.
    async fn register_uploaded(&self, registration: PhotoRegistration)
    -> Result<PhotoRecord, Error>;
}
