//! Routing of stored records to realtime subscribers.

use tracing::debug;

use super::ports::EventPublisher;
use super::{GuestRecord, PhotoRecord, RealtimeEvent};

/// Announce a stored photo.
///
/// The tag list always goes to everyone as `new_category`. The photo itself
/// goes to each tag's topic in tag order, so a subscriber in two matching
/// topics receives it twice; an untagged photo goes to everyone once.
/// Returns the number of frames queued.
pub fn announce_photo(publisher: &dyn EventPublisher, photo: &PhotoRecord) -> usize {
    let mut queued = publisher.publish_all(&RealtimeEvent::NewCategory(photo.tags.clone()));
    let event = RealtimeEvent::NewPhoto(photo.clone());
    if photo.tags.is_empty() {
        queued += publisher.publish_all(&event);
    } else {
        for tag in photo.tags.iter() {
            queued += publisher.publish_to_topic(tag, &event);
        }
    }
    debug!(photo_id = %photo.id, queued, "photo announced");
    queued
}

/// Announce a stored guest to everyone.
pub fn announce_guest(publisher: &dyn EventPublisher, guest: &GuestRecord) -> usize {
    let queued = publisher.publish_all(&RealtimeEvent::NewGuest(guest.clone()));
    debug!(guest_id = %guest.id, queued, "guest announced");
    queued
}
