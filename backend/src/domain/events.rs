//! Events pushed to realtime subscribers.
//!
//! Every event serializes to the frame clients consume:
//! `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{GuestRecord, PhotoRecord, TagList};

/// Outcome reported after a submission arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStatus {
    Ok,
    NotOk,
}

/// Payload of the `confirmation` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Confirmation {
    pub status: ConfirmationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Confirmation {
    pub fn ok() -> Self {
        Self {
            status: ConfirmationStatus::Ok,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: ConfirmationStatus::NotOk,
            error: Some(error.into()),
        }
    }
}

/// Server-to-client realtime event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum RealtimeEvent {
    Confirmation(Confirmation),
    NewGuest(GuestRecord),
    NewPhoto(PhotoRecord),
    /// Tag list of a freshly stored photo, sent to every subscriber so
    /// galleries can grow their category filters.
    NewCategory(TagList),
}

impl RealtimeEvent {
    /// Wire name of the event.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Confirmation(_) => "confirmation",
            Self::NewGuest(_) => "new_guest",
            Self::NewPhoto(_) => "new_photo",
            Self::NewCategory(_) => "new_category",
        }
    }
}
