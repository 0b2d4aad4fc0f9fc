//! Photo like handlers and like statistics.
//!
//! ```text
//! POST /api/v1/photos/{id}/likes
//! GET  /api/v1/likes/by-photo
//! GET  /api/v1/likes/by-category
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, LikeRecord, PhotoId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{CategoryCountsSchema, PhotoLikeCountsSchema};
use crate::inbound::http::state::HttpState;

/// Request payload for liking a photo.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LikeRequest {
    /// Name of the guest casting the like.
    #[schema(example = "Ana")]
    pub name: String,
}

/// Record one like. Repeated likes by the same guest accumulate.
#[utoipa::path(
    post,
    path = "/api/v1/photos/{id}/likes",
    params(("id" = Uuid, Path, description = "Photo identifier")),
    request_body = LikeRequest,
    responses(
        (status = 201, description = "Like recorded", body = LikeRecord),
        (status = 400, description = "Blank or oversized name", body = Error),
        (status = 404, description = "Photo does not exist", body = Error),
        (status = 503, description = "Like database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["likes"],
    operation_id = "likePhoto"
)]
#[post("/photos/{id}/likes")]
pub async fn like_photo(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<LikeRequest>,
) -> ApiResult<HttpResponse> {
    let photo_id = PhotoId::from_uuid(path.into_inner());
    let like = state.likes.record_like(photo_id, &payload.name).await?;
    Ok(HttpResponse::Created().json(like))
}

/// Number of likes per photo; photos without likes are omitted.
#[utoipa::path(
    get,
    path = "/api/v1/likes/by-photo",
    responses(
        (status = 200, description = "Like count per photo", body = PhotoLikeCountsSchema),
        (status = 503, description = "Like database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["likes"],
    operation_id = "likesByPhoto"
)]
#[get("/likes/by-photo")]
pub async fn likes_by_photo(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<BTreeMap<PhotoId, u64>>> {
    Ok(web::Json(state.gallery.like_counts_by_photo().await?))
}

/// Number of likes per main category of the liked photos.
#[utoipa::path(
    get,
    path = "/api/v1/likes/by-category",
    responses(
        (status = 200, description = "Like count per category", body = CategoryCountsSchema),
        (status = 503, description = "Database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["likes"],
    operation_id = "likesByCategory"
)]
#[get("/likes/by-category")]
pub async fn likes_by_category(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<BTreeMap<String, u64>>> {
    Ok(web::Json(state.gallery.like_counts_by_category().await?))
}

#[cfg(test)]
#[path = "likes_tests.rs"]
mod tests;
