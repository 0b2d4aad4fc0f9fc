//! Shared WebSocket adapter state.
//!
//! WebSocket entry points depend on domain ports only, so sessions can be
//! exercised against in-memory doubles.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::{EventPublisher, GuestCommand, PhotoCommand, TopicRegistry};

/// Origins permitted to open a realtime connection.
///
/// An empty policy accepts every origin, including requests without one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    /// Build a policy from configured origins such as `https://boda.example`.
    /// Entries that do not parse as URLs are dropped.
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = origins
            .into_iter()
            .filter_map(|origin| Url::parse(origin.as_ref().trim()).ok())
            .map(|url| url.origin().ascii_serialization())
            .collect();
        Self { allowed }
    }

    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn allows(&self, origin: &Url) -> bool {
        self.is_open() || self.allowed.contains(&origin.origin().ascii_serialization())
    }
}

/// Dependency bundle for WebSocket handlers and sessions.
#[derive(Clone)]
pub struct WsState {
    pub registry: Arc<dyn TopicRegistry>,
    pub publisher: Arc<dyn EventPublisher>,
    pub guests: Arc<dyn GuestCommand>,
    pub photos: Arc<dyn PhotoCommand>,
    pub origins: OriginPolicy,
}

impl WsState {
    pub fn new(
        registry: Arc<dyn TopicRegistry>,
        publisher: Arc<dyn EventPublisher>,
        guests: Arc<dyn GuestCommand>,
        photos: Arc<dyn PhotoCommand>,
    ) -> Self {
        Self {
            registry,
            publisher,
            guests,
            photos,
            origins: OriginPolicy::allow_all(),
        }
    }

    pub fn with_origins(mut self, origins: OriginPolicy) -> Self {
        self.origins = origins;
        self
    }
}
