//! Gallery photo HTTP handlers.
//!
//! ```text
//! GET  /api/v1/photos?page&limit&tag
//! POST /api/v1/photos
//! POST /api/v1/photos/upload
//! GET  /api/v1/photos/stats/count-by-category
//! ```

use std::collections::BTreeMap;

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{HttpResponse, get, post, web};
use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt as _;
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::PhotoFilter;
use crate::domain::{Error, PhotoId, PhotoRecord, PhotoRegistration, PhotoUpload};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{CategoryCountsSchema, PhotoPageSchema};
use crate::inbound::http::state::HttpState;

/// Ceiling for the plain text parts of the upload form.
const TEXT_FIELD_LIMIT: usize = 64 * 1024;

/// Query parameters accepted by the photo listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PhotoListQuery {
    /// One-based page number; defaults to 1.
    pub page: Option<u32>,
    /// Page size between 1 and 100; defaults to 10.
    pub limit: Option<u32>,
    /// Only photos carrying exactly this tag.
    pub tag: Option<String>,
}

impl PhotoListQuery {
    fn into_parts(self) -> Result<(PhotoFilter, PageRequest), Error> {
        let request = PageRequest::from_query(self.page, self.limit).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "page": self.page, "limit": self.limit }))
        })?;
        let tag = self
            .tag
            .map(|tag| tag.trim().to_owned())
            .filter(|tag| !tag.is_empty());
        Ok((PhotoFilter { tag }, request))
    }
}

/// Response for a photo registered by URL.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredPhotoBody {
    pub id: PhotoId,
    pub image_url: String,
    pub image_url_thumb: String,
}

impl From<PhotoRecord> for RegisteredPhotoBody {
    fn from(record: PhotoRecord) -> Self {
        Self {
            id: record.id,
            image_url: record.image_url,
            image_url_thumb: record.image_url_thumb,
        }
    }
}

/// Multipart form accepted by the upload endpoint, for documentation only.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PhotoUploadForm {
    /// Image bytes; the part's content type must be `image/*`.
    #[schema(value_type = String, format = Binary)]
    photo: Vec<u8>,
    title: Option<String>,
    /// Comma separated, for example `venue,ceremony/vows`.
    tags: Option<String>,
    /// JSON object of flat key/value pairs.
    metadata: Option<String>,
}

/// Newest-first page of gallery photos.
#[utoipa::path(
    get,
    path = "/api/v1/photos",
    params(PhotoListQuery),
    responses(
        (status = 200, description = "Page of photos", body = PhotoPageSchema),
        (status = 400, description = "Invalid page request", body = Error),
        (status = 503, description = "Photo database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["photos"],
    operation_id = "listPhotos"
)]
#[get("/photos")]
pub async fn list_photos(
    state: web::Data<HttpState>,
    query: web::Query<PhotoListQuery>,
) -> ApiResult<web::Json<Page<PhotoRecord>>> {
    let (filter, request) = query.into_inner().into_parts()?;
    let page = state.gallery.list_photos(&filter, request).await?;
    Ok(web::Json(page))
}

/// Register a photo that is already hosted elsewhere.
#[utoipa::path(
    post,
    path = "/api/v1/photos",
    request_body = PhotoRegistration,
    responses(
        (status = 201, description = "Photo registered", body = RegisteredPhotoBody),
        (status = 400, description = "Invalid registration", body = Error),
        (status = 503, description = "Photo database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["photos"],
    operation_id = "registerPhoto"
)]
#[post("/photos")]
pub async fn register_photo(
    state: web::Data<HttpState>,
    payload: web::Json<PhotoRegistration>,
) -> ApiResult<HttpResponse> {
    let record = state.photos.register_uploaded(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(RegisteredPhotoBody::from(record)))
}

/// Upload an image, derive its thumbnail and add it to the gallery.
#[utoipa::path(
    post,
    path = "/api/v1/photos/upload",
    request_body(content = PhotoUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Photo stored", body = PhotoRecord),
        (status = 400, description = "Malformed form or metadata", body = Error),
        (status = 413, description = "Image exceeds the upload limit", body = Error),
        (status = 415, description = "Part is not an image", body = Error),
        (status = 503, description = "Storage or database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["photos"],
    operation_id = "uploadPhoto"
)]
#[post("/photos/upload")]
pub async fn upload_photo(
    state: web::Data<HttpState>,
    form: Multipart,
) -> ApiResult<HttpResponse> {
    let upload = read_upload(form, state.max_upload_bytes).await?;
    let record = state.photos.submit_upload(upload).await?;
    Ok(HttpResponse::Created().json(record))
}

/// Number of photos per main category.
#[utoipa::path(
    get,
    path = "/api/v1/photos/stats/count-by-category",
    responses(
        (status = 200, description = "Photo count per category", body = CategoryCountsSchema),
        (status = 503, description = "Photo database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["photos"],
    operation_id = "countPhotosByCategory"
)]
#[get("/photos/stats/count-by-category")]
pub async fn count_by_category(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<BTreeMap<String, u64>>> {
    let counts = state.gallery.count_by_category().await?;
    Ok(web::Json(counts))
}

fn multipart_error(err: MultipartError) -> Error {
    debug!(error = %err, "multipart form rejected");
    Error::invalid_request(format!("malformed multipart form: {err}"))
}

async fn read_field(mut field: Field, name: &str, limit: usize) -> Result<Bytes, Error> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        if buffer.len() + chunk.len() > limit {
            return Err(
                Error::payload_too_large(format!("{name} exceeds the {limit} byte limit"))
                    .with_details(json!({ "field": name, "limit": limit })),
            );
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}

async fn read_text(field: Field, name: &str) -> Result<String, Error> {
    let bytes = read_field(field, name, TEXT_FIELD_LIMIT).await?;
    String::from_utf8(bytes.to_vec()).map_err(|_| {
        Error::invalid_request(format!("{name} must be UTF-8 text"))
            .with_details(json!({ "field": name }))
    })
}

/// Collect the upload form, refusing an image part above `max_bytes` before
/// it is fully buffered.
async fn read_upload(mut form: Multipart, max_bytes: usize) -> Result<PhotoUpload, Error> {
    let mut image: Option<(Bytes, String)> = None;
    let mut upload = PhotoUpload {
        content: Bytes::new(),
        content_type: String::new(),
        title: String::new(),
        tags: String::new(),
        metadata: String::new(),
    };

    while let Some(field) = form.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "photo" => {
                let content_type = field
                    .content_type()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                let bytes = read_field(field, "photo", max_bytes).await?;
                image = Some((bytes, content_type));
            }
            "title" => upload.title = read_text(field, "title").await?,
            "tags" => upload.tags = read_text(field, "tags").await?,
            "metadata" => upload.metadata = read_text(field, "metadata").await?,
            other => debug!(field = other, "ignoring unknown form field"),
        }
    }

    let (content, content_type) = image.ok_or_else(|| {
        Error::invalid_request("photo part is required").with_details(json!({ "field": "photo" }))
    })?;
    upload.content = content;
    upload.content_type = content_type;
    Ok(upload)
}

#[cfg(test)]
#[path = "photos_tests.rs"]
mod tests;
