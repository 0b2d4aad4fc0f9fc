//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod error;
pub mod guests;
pub mod health;
pub mod likes;
pub mod photos;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

/// Register every REST handler on `cfg`; mounted under `/api/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(guests::list_guests)
        .service(guests::submit_guest)
        .service(photos::list_photos)
        .service(photos::register_photo)
        .service(photos::upload_photo)
        .service(photos::count_by_category)
        .service(likes::like_photo)
        .service(likes::likes_by_photo)
        .service(likes::likes_by_category);
}
