//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the guest, photo and like repository ports,
//! backed by PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain records.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: driver failures map to each port's
//!   `Connection` / `Query` variants.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselGuestRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/wedding")).await?;
//! let guests = DieselGuestRepository::new(pool);
//! ```

mod diesel_guest_repository;
pub(crate) mod diesel_helpers;
mod diesel_like_repository;
mod diesel_photo_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_guest_repository::DieselGuestRepository;
pub use diesel_like_repository::DieselLikeRepository;
pub use diesel_photo_repository::DieselPhotoRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
