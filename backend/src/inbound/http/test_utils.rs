//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::{App, web};

use crate::domain::ports::{
    FixtureGuestRepository, FixtureLikeRepository, FixtureNotifier, FixtureObjectStore,
    FixturePhotoRepository, FixtureThumbnailGenerator,
};
use crate::domain::{
    GalleryService, GuestRegistrationService, PhotoIngestPorts, PhotoIngestService, UploadPolicy,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::test_support::{RecordingPublisher, fixture_clock};

/// HTTP state backed by real services over in-memory ports.
pub struct FixtureHttp {
    pub state: HttpState,
    pub store: Arc<FixtureObjectStore>,
    pub photos: Arc<FixturePhotoRepository>,
    pub publisher: Arc<RecordingPublisher>,
}

pub fn fixture_http(max_upload_bytes: usize) -> FixtureHttp {
    let store = Arc::new(FixtureObjectStore::default());
    let photos = Arc::new(FixturePhotoRepository::default());
    let likes = Arc::new(FixtureLikeRepository::default());
    let publisher = Arc::new(RecordingPublisher::default());
    let guests = Arc::new(GuestRegistrationService::new(
        Arc::new(FixtureGuestRepository::default()),
        Arc::new(FixtureNotifier::default()),
        publisher.clone(),
        fixture_clock(),
        Vec::new(),
    ));
    let ingest = PhotoIngestService::new(
        PhotoIngestPorts {
            store: store.clone(),
            thumbnails: Arc::new(FixtureThumbnailGenerator),
            photos: photos.clone(),
            publisher: publisher.clone(),
            clock: fixture_clock(),
        },
        UploadPolicy {
            max_bytes: max_upload_bytes,
        },
    );
    let gallery = Arc::new(GalleryService::new(photos.clone(), likes));
    let state = HttpState::new(HttpStatePorts {
        guests: guests.clone(),
        guests_query: guests,
        photos: Arc::new(ingest),
        gallery: gallery.clone(),
        likes: gallery,
    })
    .with_max_upload_bytes(max_upload_bytes);
    FixtureHttp {
        state,
        store,
        photos,
        publisher,
    }
}

/// App exposing the REST surface under `/api/v1`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(super::error::json_config())
        .app_data(super::error::query_config())
        .app_data(super::error::path_config())
        .service(web::scope("/api/v1").configure(super::configure))
}

/// One part of a hand-built `multipart/form-data` body.
pub struct FormPart<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub body: &'a [u8],
}

impl<'a> FormPart<'a> {
    pub fn text(name: &'a str, body: &'a str) -> Self {
        Self {
            name,
            filename: None,
            content_type: None,
            body: body.as_bytes(),
        }
    }

    pub fn file(name: &'a str, content_type: &'a str, body: &'a [u8]) -> Self {
        Self {
            name,
            filename: Some("upload.bin"),
            content_type: Some(content_type),
            body,
        }
    }
}

pub const FORM_BOUNDARY: &str = "wedding-form-boundary";

/// Encode `parts` and return the matching content type header value.
pub fn multipart_body(parts: &[FormPart<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{FORM_BOUNDARY}\r\n").as_bytes());
        let disposition = match part.filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"\r\n",
                part.name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
        };
        body.extend_from_slice(disposition.as_bytes());
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.body);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{FORM_BOUNDARY}--\r\n").as_bytes());
    (
        format!("multipart/form-data; boundary={FORM_BOUNDARY}"),
        body,
    )
}
