//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::UploadPolicy;
use crate::domain::ports::{Notifier, ObjectStore, ThumbnailGenerator};
use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
///
/// Every adapter is optional; missing ones fall back to the in-memory
/// fixtures so the server can run in tests without external services.
#[derive(Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) object_store: Option<Arc<dyn ObjectStore>>,
    pub(crate) thumbnails: Option<Arc<dyn ThumbnailGenerator>>,
    pub(crate) notifier: Option<Arc<dyn Notifier>>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) operators: Vec<String>,
    pub(crate) upload_policy: UploadPolicy,
    pub(crate) allowed_origins: Vec<String>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            object_store: None,
            thumbnails: None,
            notifier: None,
            clock: Arc::new(DefaultClock),
            operators: Vec::new(),
            upload_policy: UploadPolicy::default(),
            allowed_origins: Vec::new(),
        }
    }

    /// Use Diesel repositories backed by `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.object_store = Some(store);
        self
    }

    #[must_use]
    pub fn with_thumbnails(mut self, thumbnails: Arc<dyn ThumbnailGenerator>) -> Self {
        self.thumbnails = Some(thumbnails);
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Addresses copied on every RSVP email.
    #[must_use]
    pub fn with_operators(mut self, operators: Vec<String>) -> Self {
        self.operators = operators;
        self
    }

    #[must_use]
    pub fn with_upload_policy(mut self, policy: UploadPolicy) -> Self {
        self.upload_policy = policy;
        self
    }

    /// Origins allowed to open the realtime socket; empty allows all.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
