//! Wire-level messages accepted from realtime clients.
//!
//! Frames are JSON objects `{"event": <name>, "data": <payload>}`; outbound
//! frames use the same envelope via [`crate::domain::RealtimeEvent`].

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{GuestSubmission, PhotoRegistration};

/// Event names accepted from clients.
pub const CLIENT_EVENTS: [&str; 4] = [
    "join_tag_topics",
    "leave_tag_topics",
    "new_guest",
    "photo_uploaded",
];

/// Inbound client frame.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to `new_photo` frames for each tag.
    JoinTagTopics(Vec<Value>),
    /// Unsubscribe from each tag.
    LeaveTagTopics(Vec<Value>),
    /// RSVP submitted over the realtime channel.
    NewGuest(GuestSubmission),
    /// Photo already uploaded by the client, registered by URL.
    PhotoUploaded(PhotoRegistration),
}

/// Topic names from a join/leave payload.
///
/// Non-string and blank entries are ignored; names are trimmed.
pub fn topic_names(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|value| match value {
            Value::String(name) => {
                let trimmed = name.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            }
            _ => None,
        })
        .collect()
}

/// Why an inbound text frame could not become a [`ClientMessage`].
#[derive(Debug, Error)]
pub enum FrameError {
    /// Not a JSON object carrying a string `event`.
    #[error("malformed frame: {0}")]
    Malformed(serde_json::Error),
    #[error("unknown event `{event}`")]
    UnknownEvent { event: String },
    /// A known event whose `data` does not fit its payload.
    #[error("invalid {event} payload: {source}")]
    InvalidData {
        event: String,
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
}

/// Parse a text frame, telling a bad payload for a known event apart from a
/// frame that is not part of the protocol at all.
pub fn parse_client_frame(text: &str) -> Result<ClientMessage, FrameError> {
    let Envelope { event } = serde_json::from_str(text).map_err(FrameError::Malformed)?;
    if !CLIENT_EVENTS.contains(&event.as_str()) {
        return Err(FrameError::UnknownEvent { event });
    }
    serde_json::from_str(text).map_err(|source| FrameError::InvalidData { event, source })
}
