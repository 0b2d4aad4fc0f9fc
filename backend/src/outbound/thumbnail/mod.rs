//! Thumbnail derivation adapters.

mod image_thumbnailer;

pub use image_thumbnailer::{ImageThumbnailer, ThumbnailConfig};
