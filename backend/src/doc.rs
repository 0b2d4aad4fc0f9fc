//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every REST path from the inbound layer together with
//! the schemas they reference. The document backs Swagger UI in debug builds
//! and is exported via `cargo run --bin openapi-dump`. The realtime socket at
//! `/ws` is not an OpenAPI operation and is left out.

use utoipa::OpenApi;

use crate::domain::{
    CompanionSubmission, Error, ErrorCode, GuestId, GuestProfile, GuestReceipt, GuestRecord,
    GuestSubmission, LikeRecord, PhotoId, PhotoMetadata, PhotoRecord, PhotoRegistration, TagList,
};
use crate::inbound::http::health::ProbeBody;
use crate::inbound::http::likes::LikeRequest;
use crate::inbound::http::photos::{PhotoUploadForm, RegisteredPhotoBody};
use crate::inbound::http::schemas::{
    CategoryCountsSchema, PageInfoSchema, PhotoLikeCountsSchema, PhotoPageSchema,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wedding backend API",
        description = "RSVP registration, the shared photo gallery and its statistics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::guests::list_guests,
        crate::inbound::http::guests::submit_guest,
        crate::inbound::http::photos::list_photos,
        crate::inbound::http::photos::register_photo,
        crate::inbound::http::photos::upload_photo,
        crate::inbound::http::photos::count_by_category,
        crate::inbound::http::likes::like_photo,
        crate::inbound::http::likes::likes_by_photo,
        crate::inbound::http::likes::likes_by_category,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        GuestId,
        GuestProfile,
        CompanionSubmission,
        GuestSubmission,
        GuestRecord,
        GuestReceipt,
        PhotoId,
        TagList,
        PhotoMetadata,
        PhotoRecord,
        PhotoRegistration,
        RegisteredPhotoBody,
        PhotoUploadForm,
        LikeRequest,
        LikeRecord,
        PageInfoSchema,
        PhotoPageSchema,
        CategoryCountsSchema,
        PhotoLikeCountsSchema,
        ProbeBody,
    )),
    tags(
        (name = "guests", description = "RSVP submissions and the guest list"),
        (name = "photos", description = "Gallery uploads, listings and statistics"),
        (name = "likes", description = "Photo likes and their aggregates"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Structure of the generated document.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/api/v1/guests", "get")]
    #[case("/api/v1/guests", "post")]
    #[case("/api/v1/photos", "get")]
    #[case("/api/v1/photos", "post")]
    #[case("/api/v1/photos/upload", "post")]
    #[case("/api/v1/photos/stats/count-by-category", "get")]
    #[case("/api/v1/photos/{id}/likes", "post")]
    #[case("/api/v1/likes/by-photo", "get")]
    #[case("/api/v1/likes/by-category", "get")]
    #[case("/health/ready", "get")]
    #[case("/health/live", "get")]
    fn every_route_is_documented(#[case] path: &str, #[case] method: &str) {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get(path).expect("path is documented");
        let operation = match method {
            "get" => item.get.as_ref(),
            "post" => item.post.as_ref(),
            _ => None,
        };
        assert!(operation.is_some(), "{method} {path} is documented");
    }

    #[rstest]
    fn referenced_schemas_are_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.expect("components").schemas;
        for name in ["Error", "ErrorCode", "PhotoRecord", "PhotoPage", "PageInfo"] {
            assert!(schemas.contains_key(name), "{name} is registered");
        }
    }

    #[rstest]
    fn upload_documents_payload_limits() {
        let doc = ApiDoc::openapi();
        let upload = doc
            .paths
            .paths
            .get("/api/v1/photos/upload")
            .and_then(|item| item.post.as_ref())
            .expect("upload operation");
        for status in ["201", "413", "415"] {
            assert!(upload.responses.responses.contains_key(status), "{status} documented");
        }
    }
}
