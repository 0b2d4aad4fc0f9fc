//! Gallery photos: identifiers, tags, metadata and stored records.
//!
//! Tags and metadata are persisted as serialized JSON text. Values are
//! validated on the way in; on the way out a malformed row degrades to an
//! empty collection so one bad row never breaks a listing.

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

/// Server-generated photo identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct PhotoId(Uuid);

impl PhotoId {
    /// Fresh random identifier; client-supplied ids are never used.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for PhotoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Failure decoding a stored JSON text column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stored {column} text is malformed: {message}")]
pub struct StoredTextError {
    pub column: &'static str,
    pub message: String,
}

/// Ordered photo tags. Order and duplicates are preserved.
///
/// # Examples
/// ```
/// use backend::domain::TagList;
///
/// let tags = TagList::parse_csv(" venue, ,ceremony/vows,venue");
/// assert_eq!(tags.as_slice(), ["venue", "ceremony/vows", "venue"]);
/// assert_eq!(tags.main_categories().collect::<Vec<_>>(), ["venue", "ceremony", "venue"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(from = "Vec<String>")]
pub struct TagList(Vec<String>);

impl From<Vec<String>> for TagList {
    fn from(tags: Vec<String>) -> Self {
        Self(
            tags.into_iter()
                .map(|tag| tag.trim().to_owned())
                .filter(|tag| !tag.is_empty())
                .collect(),
        )
    }
}

impl TagList {
    /// Parse a comma-delimited tag field from an upload form.
    pub fn parse_csv(raw: &str) -> Self {
        Self::from(raw.split(',').map(str::to_owned).collect::<Vec<_>>())
    }

    /// Decode the stored column value.
    pub fn from_stored(text: &str) -> Result<Self, StoredTextError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str::<Vec<String>>(text)
            .map(Self::from)
            .map_err(|err| StoredTextError {
                column: "tags",
                message: err.to_string(),
            })
    }

    /// Decode the stored column value, degrading to no tags when malformed.
    pub fn from_stored_lossy(photo_id: PhotoId, text: &str) -> Self {
        Self::from_stored(text).unwrap_or_else(|error| {
            warn!(%photo_id, %error, "ignoring malformed photo tags");
            Self::default()
        })
    }

    /// Serialized column value.
    pub fn to_stored(&self) -> String {
        Value::from(self.0.clone()).to_string()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Segment of each tag before the first `/`.
    pub fn main_categories(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter_map(|tag| tag.split('/').next())
            .map(str::trim)
            .filter(|category| !category.is_empty())
    }
}

/// Photo metadata: a flat map of string keys to primitive JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PhotoMetadata(BTreeMap<String, Value>);

/// Reasons metadata is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("metadata is not valid JSON: {message}")]
    Malformed { message: String },
    #[error("metadata must be a JSON object")]
    NotAnObject,
    #[error("metadata value for `{key}` must be a string, number, boolean or null")]
    NestedValue { key: String },
}

impl PhotoMetadata {
    /// Parse metadata text supplied by a client. Blank text is an empty map.
    pub fn parse(text: &str) -> Result<Self, MetadataError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_str(text).map_err(|err| MetadataError::Malformed {
            message: err.to_string(),
        })?;
        Self::try_from(value)
    }

    /// Decode the stored column value.
    pub fn from_stored(text: &str) -> Result<Self, StoredTextError> {
        Self::parse(text).map_err(|err| StoredTextError {
            column: "metadata",
            message: err.to_string(),
        })
    }

    /// Decode the stored column value, degrading to an empty map.
    pub fn from_stored_lossy(photo_id: PhotoId, text: &str) -> Self {
        Self::from_stored(text).unwrap_or_else(|error| {
            warn!(%photo_id, %error, "ignoring malformed photo metadata");
            Self::default()
        })
    }

    /// Serialized column value.
    pub fn to_stored(&self) -> String {
        Value::Object(self.0.clone().into_iter().collect()).to_string()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Value> for PhotoMetadata {
    type Error = MetadataError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = value else {
            return Err(MetadataError::NotAnObject);
        };
        map.into_iter()
            .map(|(key, value)| match value {
                Value::Array(_) | Value::Object(_) => Err(MetadataError::NestedValue { key }),
                primitive => Ok((key, primitive)),
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Self)
    }
}

impl<'de> Deserialize<'de> for PhotoMetadata {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
        if value.is_null() {
            return Ok(Self::default());
        }
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// Stored gallery photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub id: PhotoId,
    pub image_url: String,
    /// Equals `image_url` when no thumbnail exists.
    pub image_url_thumb: String,
    pub title: String,
    pub tags: TagList,
    pub metadata: PhotoMetadata,
    pub uploaded_at: DateTime<Utc>,
}

/// Binary upload received from a client form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub content: Bytes,
    pub content_type: String,
    pub title: String,
    /// Comma-delimited tags as typed by the client.
    pub tags: String,
    /// JSON object text; blank means no metadata.
    pub metadata: String,
}

/// Photo already uploaded elsewhere, announced over the realtime channel or
/// registered through the JSON endpoint. Any client-supplied `id` is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRegistration {
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_url_thumb: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: TagList,
    #[serde(default)]
    pub metadata: PhotoMetadata,
}

/// Reasons a photo submission is rejected before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhotoValidationError {
    #[error("content type `{content_type}` is not an image")]
    UnsupportedContentType { content_type: String },
    #[error("upload of {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },
    #[error("upload is empty")]
    EmptyContent,
    #[error("imageUrl must not be empty")]
    MissingImageUrl,
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Limits applied to binary uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: usize,
}

impl UploadPolicy {
    /// 50 MiB.
    pub const DEFAULT_MAX_BYTES: usize = 50 * 1024 * 1024;

    /// Check content type and size, and decode the tag and metadata fields.
    pub fn validate(
        &self,
        upload: &PhotoUpload,
    ) -> Result<(TagList, PhotoMetadata), PhotoValidationError> {
        if !is_image_content_type(&upload.content_type) {
            return Err(PhotoValidationError::UnsupportedContentType {
                content_type: upload.content_type.clone(),
            });
        }
        if upload.content.is_empty() {
            return Err(PhotoValidationError::EmptyContent);
        }
        if upload.content.len() > self.max_bytes {
            return Err(PhotoValidationError::TooLarge {
                size: upload.content.len(),
                max: self.max_bytes,
            });
        }
        let metadata = PhotoMetadata::parse(&upload.metadata)?;
        Ok((TagList::parse_csv(&upload.tags), metadata))
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: Self::DEFAULT_MAX_BYTES,
        }
    }
}

/// Whether `content_type` names an `image/*` media type.
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .and_then(|essence| essence.split_once('/'))
        .is_some_and(|(kind, subtype)| kind.eq_ignore_ascii_case("image") && !subtype.is_empty())
}

/// File extension used for the stored original.
pub fn extension_for(content_type: &str) -> String {
    let subtype = content_type
        .split(';')
        .next()
        .and_then(|essence| essence.split_once('/'))
        .map(|(_, subtype)| subtype.trim().to_ascii_lowercase())
        .unwrap_or_default();
    match subtype.as_str() {
        "jpeg" | "pjpeg" => "jpg".to_owned(),
        other => {
            let ext: String = other
                .split('+')
                .next()
                .unwrap_or_default()
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect();
            if ext.is_empty() { "bin".to_owned() } else { ext }
        }
    }
}
