//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **storage**: S3 object storage for photo originals and thumbnails
//! - **thumbnail**: `image` crate thumbnail derivation
//! - **notify**: SMTP email delivery via `lettre`
//! - **realtime**: in-process subscriber registry and topic fan-out
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod notify;
pub mod persistence;
pub mod realtime;
pub mod storage;
pub mod thumbnail;
