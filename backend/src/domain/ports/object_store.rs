//! Port for durable binary object storage (photo originals and thumbnails).

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;

use super::define_port_error;

define_port_error! {
    /// Errors raised by object store adapters.
    pub enum ObjectStoreError {
        /// The store could not be reached.
        Unavailable { message: String } => "object store unavailable: {message}",
        /// The store refused the object.
        Rejected { key: String, message: String } => "object store rejected {key}: {message}",
    }
}

/// Object handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Key under the configured bucket, e.g. `photos/{id}/thumb.jpg`.
    pub key: String,
    pub bytes: Bytes,
    pub content_type: String,
    /// User metadata attached to the object.
    pub metadata: BTreeMap<String, String>,
}

/// Durable object storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `object` and return its public URL.
    async fn put(&self, object: StoredObject) -> Result<String, ObjectStoreError>;
}

/// In-memory store used when no bucket is configured and by tests.
///
/// URLs take the form `memory://{key}`.
#[derive(Debug, Default)]
pub struct FixtureObjectStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl FixtureObjectStore {
    /// Keys stored so far, in lexical order.
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Copy of the object stored under `key`.
    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl ObjectStore for FixtureObjectStore {
    async fn put(&self, object: StoredObject) -> Result<String, ObjectStoreError> {
        let url = format!("memory://{}", object.key);
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(object.key.clone(), object);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_store_keeps_objects() {
        let store = FixtureObjectStore::default();
        let url = store
            .put(StoredObject {
                key: "photos/a/thumb.jpg".into(),
                bytes: Bytes::from_static(b"jpeg"),
                content_type: "image/jpeg".into(),
                metadata: BTreeMap::new(),
            })
            .await
            .expect("put succeeds");
        assert_eq!(url, "memory://photos/a/thumb.jpg");
        assert_eq!(store.keys(), ["photos/a/thumb.jpg"]);
        assert_eq!(
            store.get("photos/a/thumb.jpg").map(|object| object.bytes),
            Some(Bytes::from_static(b"jpeg"))
        );
    }
}
