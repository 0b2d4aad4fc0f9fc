//! AWS S3 implementation of the [`ObjectStore`] port.
//!
//! Objects are written with their content type and user metadata; the
//! returned URL is built from the configured public base URL, or the bucket's
//! virtual-hosted endpoint when none is set.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, warn};

use crate::domain::ports::{ObjectStore, ObjectStoreError, StoredObject};

/// Bucket coordinates used to address uploaded objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3StoreConfig {
    pub bucket: String,
    pub region: String,
    /// CDN or website origin serving the bucket, without trailing slash.
    pub public_base_url: Option<String>,
}

impl S3StoreConfig {
    /// Public URL of `key`.
    pub fn public_url(&self, key: &str) -> String {
        match self.public_base_url.as_deref() {
            Some(base) => format!("{}/{key}", base.trim_end_matches('/')),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{key}",
                self.bucket, self.region
            ),
        }
    }
}

/// S3-backed object store.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    config: S3StoreConfig,
}

impl S3ObjectStore {
    pub fn new(client: Client, config: S3StoreConfig) -> Self {
        Self { client, config }
    }

    /// Build a client from the ambient AWS environment (credentials chain,
    /// profile) pinned to the configured region.
    pub async fn from_env(config: S3StoreConfig) -> Self {
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;
        Self::new(Client::new(&shared), config)
    }
}

fn map_sdk_error<E, R>(key: &str, error: SdkError<E, R>) -> ObjectStoreError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&error).to_string();
    match error {
        SdkError::ServiceError(_) => ObjectStoreError::rejected(key, message),
        _ => ObjectStoreError::unavailable(message),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, object: StoredObject) -> Result<String, ObjectStoreError> {
        let StoredObject {
            key,
            bytes,
            content_type,
            metadata,
        } = object;
        let size = bytes.len();
        let mut request = self
            .client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes));
        for (name, value) in metadata {
            request = request.metadata(name, value);
        }
        request.send().await.map_err(|err| {
            let mapped = map_sdk_error(&key, err);
            warn!(key = %key, error = %mapped, "object upload failed");
            mapped
        })?;
        debug!(key = %key, size, "object uploaded");
        Ok(self.config.public_url(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config(public_base_url: Option<&str>) -> S3StoreConfig {
        S3StoreConfig {
            bucket: "boda-fotos".into(),
            region: "eu-west-1".into(),
            public_base_url: public_base_url.map(str::to_owned),
        }
    }

    #[rstest]
    #[case(None, "https://boda-fotos.s3.eu-west-1.amazonaws.com/photos/a/thumb.jpg")]
    #[case(Some("https://cdn.example"), "https://cdn.example/photos/a/thumb.jpg")]
    #[case(Some("https://cdn.example/"), "https://cdn.example/photos/a/thumb.jpg")]
    fn public_urls(#[case] base: Option<&str>, #[case] expected: &str) {
        assert_eq!(config(base).public_url("photos/a/thumb.jpg"), expected);
    }
}
