//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! to and from domain records.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    GuestId, GuestProfile, GuestRecord, LikeRecord, NewGuest, PhotoId, PhotoMetadata,
    PhotoRecord, TagList,
};

use super::schema::{guests, photo_likes, photo_tags, photos};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = guests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GuestRow {
    pub id: i64,
    pub full_name: String,
    pub attending: bool,
    pub companion_count: i32,
    pub restrictions: String,
    pub bus_attendance: bool,
    pub bus_type: String,
    pub song_preference: String,
    pub music_platform: String,
    pub message: String,
    pub color: String,
    pub principal_guest_id: Option<i64>,
    pub responded_at: DateTime<Utc>,
}

impl From<GuestRow> for GuestRecord {
    fn from(row: GuestRow) -> Self {
        Self {
            id: GuestId::new(row.id),
            profile: GuestProfile {
                full_name: row.full_name,
                attending: row.attending,
                companion_count: u32::try_from(row.companion_count).unwrap_or_default(),
                restrictions: row.restrictions,
                bus_attendance: row.bus_attendance,
                bus_type: row.bus_type,
                song_preference: row.song_preference,
                music_platform: row.music_platform,
                message: row.message,
                color: row.color,
            },
            principal_id: row.principal_guest_id.map(GuestId::new),
            responded_at: row.responded_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = guests)]
pub(crate) struct NewGuestRow<'a> {
    pub full_name: &'a str,
    pub attending: bool,
    pub companion_count: i32,
    pub restrictions: &'a str,
    pub bus_attendance: bool,
    pub bus_type: &'a str,
    pub song_preference: &'a str,
    pub music_platform: &'a str,
    pub message: &'a str,
    pub color: &'a str,
    pub principal_guest_id: Option<i64>,
    pub responded_at: DateTime<Utc>,
}

impl<'a> NewGuestRow<'a> {
    pub fn new(guest: &'a NewGuest, principal: Option<GuestId>) -> Self {
        let profile = &guest.profile;
        Self {
            full_name: &profile.full_name,
            attending: profile.attending,
            companion_count: i32::try_from(profile.companion_count).unwrap_or(i32::MAX),
            restrictions: &profile.restrictions,
            bus_attendance: profile.bus_attendance,
            bus_type: &profile.bus_type,
            song_preference: &profile.song_preference,
            music_platform: &profile.music_platform,
            message: &profile.message,
            color: &profile.color,
            principal_guest_id: principal.map(GuestId::get),
            responded_at: guest.responded_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = photos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PhotoRow {
    pub id: Uuid,
    pub image_url: String,
    pub image_url_thumb: String,
    pub title: String,
    pub tags: String,
    pub metadata: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<PhotoRow> for PhotoRecord {
    /// Malformed tag or metadata text degrades to an empty collection.
    fn from(row: PhotoRow) -> Self {
        let id = PhotoId::from_uuid(row.id);
        Self {
            id,
            image_url: row.image_url,
            image_url_thumb: row.image_url_thumb,
            title: row.title,
            tags: TagList::from_stored_lossy(id, &row.tags),
            metadata: PhotoMetadata::from_stored_lossy(id, &row.metadata),
            uploaded_at: row.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = photos)]
pub(crate) struct NewPhotoRow<'a> {
    pub id: Uuid,
    pub image_url: &'a str,
    pub image_url_thumb: &'a str,
    pub title: &'a str,
    pub tags: String,
    pub metadata: String,
    pub uploaded_at: DateTime<Utc>,
}

impl<'a> From<&'a PhotoRecord> for NewPhotoRow<'a> {
    fn from(photo: &'a PhotoRecord) -> Self {
        Self {
            id: *photo.id.as_uuid(),
            image_url: &photo.image_url,
            image_url_thumb: &photo.image_url_thumb,
            title: &photo.title,
            tags: photo.tags.to_stored(),
            metadata: photo.metadata.to_stored(),
            uploaded_at: photo.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = photo_tags)]
pub(crate) struct NewPhotoTagRow<'a> {
    pub photo_id: Uuid,
    pub position: i32,
    pub tag: &'a str,
}

/// Index rows for every tag of `photo`, in tag order.
pub(crate) fn tag_rows(photo: &PhotoRecord) -> Vec<NewPhotoTagRow<'_>> {
    photo
        .tags
        .iter()
        .zip(0_i32..)
        .map(|(tag, position)| NewPhotoTagRow {
            photo_id: *photo.id.as_uuid(),
            position,
            tag,
        })
        .collect()
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = photo_likes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LikeRow {
    pub photo_id: Uuid,
    pub voter_name: String,
}

impl From<LikeRow> for LikeRecord {
    fn from(row: LikeRow) -> Self {
        Self {
            photo_id: PhotoId::from_uuid(row.photo_id),
            voter: row.voter_name,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = photo_likes)]
pub(crate) struct NewLikeRow<'a> {
    pub photo_id: Uuid,
    pub voter_name: &'a str,
    pub liked_at: DateTime<Utc>,
}
