//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`, so they only depend on
//! domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::UploadPolicy;
use crate::domain::ports::{GalleryQuery, GuestCommand, GuestQuery, LikeCommand, PhotoCommand};

/// Parameter object bundling every port the HTTP handlers use.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub guests: Arc<dyn GuestCommand>,
    pub guests_query: Arc<dyn GuestQuery>,
    pub photos: Arc<dyn PhotoCommand>,
    pub gallery: Arc<dyn GalleryQuery>,
    pub likes: Arc<dyn LikeCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub guests: Arc<dyn GuestCommand>,
    pub guests_query: Arc<dyn GuestQuery>,
    pub photos: Arc<dyn PhotoCommand>,
    pub gallery: Arc<dyn GalleryQuery>,
    pub likes: Arc<dyn LikeCommand>,
    /// Largest multipart image accepted before the body is fully read.
    pub max_upload_bytes: usize,
}

impl HttpState {
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            guests,
            guests_query,
            photos,
            gallery,
            likes,
        } = ports;
        Self {
            guests,
            guests_query,
            photos,
            gallery,
            likes,
            max_upload_bytes: UploadPolicy::DEFAULT_MAX_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
