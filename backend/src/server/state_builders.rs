//! Builders for the HTTP and WebSocket states from a [`ServerConfig`].

use std::sync::Arc;

use crate::domain::ports::{
    FixtureGuestRepository, FixtureLikeRepository, FixtureNotifier, FixtureObjectStore,
    FixturePhotoRepository, FixtureThumbnailGenerator, GuestRepository, LikeRepository,
    PhotoRepository,
};
use crate::domain::{
    GalleryService, GuestRegistrationService, PhotoIngestPorts, PhotoIngestService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::ws::state::{OriginPolicy, WsState};
use crate::outbound::persistence::{
    DbPool, DieselGuestRepository, DieselLikeRepository, DieselPhotoRepository,
};
use crate::outbound::realtime::RealtimeHub;

use super::ServerConfig;

struct Repositories {
    guests: Arc<dyn GuestRepository>,
    photos: Arc<dyn PhotoRepository>,
    likes: Arc<dyn LikeRepository>,
}

/// Diesel repositories when a pool is available, otherwise in-memory ones.
fn build_repositories(pool: Option<&DbPool>) -> Repositories {
    match pool {
        Some(pool) => Repositories {
            guests: Arc::new(DieselGuestRepository::new(pool.clone())),
            photos: Arc::new(DieselPhotoRepository::new(pool.clone())),
            likes: Arc::new(DieselLikeRepository::new(pool.clone())),
        },
        None => Repositories {
            guests: Arc::new(FixtureGuestRepository::default()),
            photos: Arc::new(FixturePhotoRepository::default()),
            likes: Arc::new(FixtureLikeRepository::default()),
        },
    }
}

/// States shared by every worker, plus the hub behind the realtime channel.
pub struct AppStates {
    pub http: HttpState,
    pub ws: WsState,
    pub hub: Arc<RealtimeHub>,
}

/// Wire services over the configured adapters.
///
/// One [`RealtimeHub`] serves as both the publisher used by services and the
/// registry used by socket sessions, so every worker fans out to every
/// connection.
pub fn build_states(config: &ServerConfig) -> AppStates {
    let hub = Arc::new(RealtimeHub::new());
    let Repositories {
        guests,
        photos,
        likes,
    } = build_repositories(config.db_pool.as_ref());

    let guest_service = Arc::new(GuestRegistrationService::new(
        guests,
        config
            .notifier
            .clone()
            .unwrap_or_else(|| Arc::new(FixtureNotifier::default())),
        hub.clone(),
        config.clock.clone(),
        config.operators.clone(),
    ));
    let photo_service = Arc::new(PhotoIngestService::new(
        PhotoIngestPorts {
            store: config
                .object_store
                .clone()
                .unwrap_or_else(|| Arc::new(FixtureObjectStore::default())),
            thumbnails: config
                .thumbnails
                .clone()
                .unwrap_or_else(|| Arc::new(FixtureThumbnailGenerator)),
            photos: photos.clone(),
            publisher: hub.clone(),
            clock: config.clock.clone(),
        },
        config.upload_policy,
    ));
    let gallery = Arc::new(GalleryService::new(photos, likes));

    let http = HttpState::new(HttpStatePorts {
        guests: guest_service.clone(),
        guests_query: guest_service.clone(),
        photos: photo_service.clone(),
        gallery: gallery.clone(),
        likes: gallery,
    })
    .with_max_upload_bytes(config.upload_policy.max_bytes);
    let ws = WsState::new(hub.clone(), hub.clone(), guest_service, photo_service)
        .with_origins(OriginPolicy::new(&config.allowed_origins));

    AppStates { http, ws, hub }
}
