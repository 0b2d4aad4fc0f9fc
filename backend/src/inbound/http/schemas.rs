//! OpenAPI schema definitions for types owned by other crates.
//!
//! The `pagination` crate stays free of utoipa, so the paginated envelope
//! and the count maps are described here using utoipa's external schema
//! registration.

use std::collections::BTreeMap;

use utoipa::ToSchema;

use crate::domain::PhotoRecord;

/// OpenAPI schema for [`pagination::PageInfo`].
#[derive(ToSchema)]
#[schema(as = PageInfo, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageInfoSchema {
    /// Number of photos across all pages.
    #[schema(example = 42)]
    total: u64,
    /// `ceil(total / limit)`; zero when nothing matches.
    #[schema(example = 5)]
    total_pages: u64,
    /// Page that was requested, starting at one.
    #[schema(example = 1)]
    current_page: u32,
    /// Page size that was requested.
    #[schema(example = 10)]
    limit: u32,
}

/// OpenAPI schema for `pagination::Page<PhotoRecord>`.
#[derive(ToSchema)]
#[schema(as = PhotoPage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PhotoPageSchema {
    /// Photos on this page, newest first.
    items: Vec<PhotoRecord>,
    pagination: PageInfoSchema,
}

/// Counts keyed by main category.
#[derive(ToSchema)]
#[schema(as = CategoryCounts)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CategoryCountsSchema(BTreeMap<String, u64>);

/// Like counts keyed by photo identifier.
#[derive(ToSchema)]
#[schema(as = PhotoLikeCounts)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PhotoLikeCountsSchema(BTreeMap<String, u64>);
