//! Domain entities, ports and services.
//!
//! Purpose: hold everything that is independent of HTTP, WebSocket, Diesel,
//! S3 or SMTP. Adapters depend on this module; it depends on none of them.
//!
//! Public surface:
//! - Entities: [`GuestRecord`], [`PhotoRecord`], [`LikeRecord`] and the
//!   submissions that produce them.
//! - [`RealtimeEvent`] — frames pushed to live subscribers.
//! - Services: [`PhotoIngestService`], [`GuestRegistrationService`],
//!   [`GalleryService`].
//! - [`Error`] / [`ErrorCode`] — transport-agnostic failures.

pub mod error;
mod events;
pub mod fanout;
mod gallery;
mod guest;
mod guest_registration;
mod like;
pub mod notification;
mod photo;
mod photo_ingest;
pub mod ports;
mod trace_id;

pub use self::error::{Error, ErrorCode};
pub use self::events::{Confirmation, ConfirmationStatus, RealtimeEvent};
pub use self::gallery::{GalleryService, fold_category_counts};
pub use self::guest::{
    CompanionSubmission, GuestId, GuestProfile, GuestReceipt, GuestRecord, GuestSubmission,
    GuestValidationError, MAX_COMPANIONS, MAX_NAME_CHARS, NewGuest,
};
pub use self::guest_registration::{GuestRegistrationService, GuestSubmissionError};
pub use self::like::{LikeRecord, LikeValidationError, MAX_VOTER_CHARS};
pub use self::photo::{
    MetadataError, PhotoId, PhotoMetadata, PhotoRecord, PhotoRegistration, PhotoUpload,
    PhotoValidationError, StoredTextError, TagList, UploadPolicy, extension_for,
    is_image_content_type,
};
pub use self::photo_ingest::{PhotoIngestPorts, PhotoIngestService, PhotoSubmissionError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
