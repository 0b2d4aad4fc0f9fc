//! Port for deriving gallery thumbnails from uploaded originals.

use async_trait::async_trait;
use bytes::Bytes;

use super::define_port_error;

define_port_error! {
    /// Errors raised while deriving a thumbnail.
    pub enum ThumbnailError {
        /// The original is not a decodable image.
        Decode { message: String } => "image could not be decoded: {message}",
        /// The thumbnail could not be encoded.
        Encode { message: String } => "thumbnail could not be encoded: {message}",
        /// The blocking worker running the resize failed.
        Worker { message: String } => "thumbnail worker failed: {message}",
    }
}

/// Thumbnail derivation.
///
/// Implementations honour embedded orientation, crop to a centred square and
/// return JPEG bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThumbnailGenerator: Send + Sync {
    async fn derive(&self, original: Bytes) -> Result<Bytes, ThumbnailError>;
}

/// Pass-through generator used by tests that do not exercise image decoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureThumbnailGenerator;

#[async_trait]
impl ThumbnailGenerator for FixtureThumbnailGenerator {
    async fn derive(&self, original: Bytes) -> Result<Bytes, ThumbnailError> {
        if original.is_empty() {
            return Err(ThumbnailError::decode("empty image"));
        }
        Ok(original)
    }
}
