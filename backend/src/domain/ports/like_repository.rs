//! Port for photo like persistence.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::LikeRecord;

use super::define_port_error;

define_port_error! {
    /// Errors raised by like repository adapters.
    pub enum LikeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "like repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "like repository query failed: {message}",
        /// The liked photo does not exist.
        PhotoNotFound { photo_id: String } => "photo not found: {photo_id}",
    }
}

/// Like storage. Every call appends; nothing is deduplicated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn record_like(&self, like: &LikeRecord) -> Result<(), LikeRepositoryError>;

    async fn list_likes(&self) -> Result<Vec<LikeRecord>, LikeRepositoryError>;
}

/// In-memory like store used when no database is configured and by tests.
#[derive(Debug, Default)]
pub struct FixtureLikeRepository {
    likes: Mutex<Vec<LikeRecord>>,
}

#[async_trait]
impl LikeRepository for FixtureLikeRepository {
    async fn record_like(&self, like: &LikeRecord) -> Result<(), LikeRepositoryError> {
        self.likes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(like.clone());
        Ok(())
    }

    async fn list_likes(&self) -> Result<Vec<LikeRecord>, LikeRepositoryError> {
        Ok(self
            .likes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}
