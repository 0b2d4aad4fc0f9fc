//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod event_publisher;
mod gallery_query;
mod guest_command;
mod guest_repository;
mod like_repository;
mod notifier;
mod object_store;
mod photo_command;
mod photo_repository;
mod thumbnail_generator;

pub use event_publisher::{EventPublisher, SubscriberId, Subscription, TopicRegistry};
#[cfg(test)]
pub use event_publisher::{MockEventPublisher, MockTopicRegistry};
#[cfg(test)]
pub use gallery_query::{MockGalleryQuery, MockLikeCommand};
pub use gallery_query::{GalleryQuery, LikeCommand};
#[cfg(test)]
pub use guest_command::{MockGuestCommand, MockGuestQuery};
pub use guest_command::{GuestCommand, GuestQuery};
#[cfg(test)]
pub use guest_repository::MockGuestRepository;
pub use guest_repository::{FixtureGuestRepository, GuestRepository, GuestRepositoryError};
#[cfg(test)]
pub use like_repository::MockLikeRepository;
pub use like_repository::{FixtureLikeRepository, LikeRepository, LikeRepositoryError};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{EmailMessage, FixtureNotifier, NotificationError, Notifier};
#[cfg(test)]
pub use object_store::MockObjectStore;
pub use object_store::{FixtureObjectStore, ObjectStore, ObjectStoreError, StoredObject};
#[cfg(test)]
pub use photo_command::MockPhotoCommand;
pub use photo_command::PhotoCommand;
#[cfg(test)]
pub use photo_repository::MockPhotoRepository;
pub use photo_repository::{
    FixturePhotoRepository, PhotoFilter, PhotoRepository, PhotoRepositoryError, StoredPhotoTags,
};
#[cfg(test)]
pub use thumbnail_generator::MockThumbnailGenerator;
pub use thumbnail_generator::{FixtureThumbnailGenerator, ThumbnailError, ThumbnailGenerator};
