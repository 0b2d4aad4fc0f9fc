//! WebSocket inbound adapter for the realtime channel.
//!
//! Responsibilities:
//! - validate upgrade requests against the configured origin allow-list
//! - register each connection with the topic registry
//! - run the per-connection session loop

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use tracing::{error, warn};
use url::Url;

mod session;

pub mod messages;
pub mod state;

use state::{OriginPolicy, WsState};

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<WsState>,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    check_origin(&req, &state.origins)?;

    let (response, session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        error
    })?;
    let subscription = state.registry.connect();
    actix_web::rt::spawn(session::handle_ws_session(
        state.get_ref().clone(),
        subscription,
        session,
        messages,
    ));
    Ok(response)
}

fn check_origin(req: &HttpRequest, policy: &OriginPolicy) -> actix_web::Result<()> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let Some(origin_header) = origin_iter.next() else {
        if policy.is_open() {
            return Ok(());
        }
        error!("Missing Origin header on WebSocket upgrade");
        return Err(actix_web::error::ErrorForbidden("Origin not allowed"));
    };
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }
    validate_origin(origin_header, policy)
}

fn validate_origin(origin_header: &HeaderValue, policy: &OriginPolicy) -> actix_web::Result<()> {
    let origin_value = origin_header.to_str().map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as string");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if policy.allows(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}
