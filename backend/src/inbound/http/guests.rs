//! Guest RSVP HTTP handlers.
//!
//! ```text
//! GET  /api/v1/guests
//! POST /api/v1/guests
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{Error, GuestReceipt, GuestRecord, GuestSubmission};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Every stored guest, principals and companions alike, in insertion order.
#[utoipa::path(
    get,
    path = "/api/v1/guests",
    responses(
        (status = 200, description = "Stored guests", body = [GuestRecord]),
        (status = 503, description = "Guest database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["guests"],
    operation_id = "listGuests"
)]
#[get("/guests")]
pub async fn list_guests(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<GuestRecord>>> {
    let guests = state.guests_query.list_guests().await?;
    Ok(web::Json(guests))
}

/// Register an RSVP with its companions.
///
/// The principal is stored first; companions that fail to store are counted
/// in the receipt but do not fail the request.
#[utoipa::path(
    post,
    path = "/api/v1/guests",
    request_body = GuestSubmission,
    responses(
        (status = 201, description = "Guest registered", body = GuestReceipt),
        (status = 400, description = "Invalid submission", body = Error),
        (status = 503, description = "Guest database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["guests"],
    operation_id = "submitGuest"
)]
#[post("/guests")]
pub async fn submit_guest(
    state: web::Data<HttpState>,
    payload: web::Json<GuestSubmission>,
) -> ApiResult<HttpResponse> {
    let receipt = state.guests.submit(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(receipt))
}

#[cfg(test)]
#[path = "guests_tests.rs"]
mod tests;
