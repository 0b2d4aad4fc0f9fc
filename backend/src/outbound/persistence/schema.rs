//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// RSVP principals and their companions.
    guests (id) {
        id -> Int8,
        full_name -> Varchar,
        attending -> Bool,
        companion_count -> Int4,
        restrictions -> Text,
        bus_attendance -> Bool,
        bus_type -> Text,
        song_preference -> Text,
        music_platform -> Text,
        message -> Text,
        color -> Text,
        /// Set for companions only.
        principal_guest_id -> Nullable<Int8>,
        responded_at -> Timestamptz,
    }
}

diesel::table! {
    /// Gallery photos. `tags` and `metadata` hold serialized JSON text.
    photos (id) {
        id -> Uuid,
        image_url -> Text,
        image_url_thumb -> Text,
        title -> Text,
        tags -> Text,
        metadata -> Text,
        uploaded_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tag index written alongside each photo, one row per tag occurrence.
    photo_tags (photo_id, position) {
        photo_id -> Uuid,
        position -> Int4,
        tag -> Text,
    }
}

diesel::table! {
    photo_likes (id) {
        id -> Int8,
        photo_id -> Uuid,
        voter_name -> Varchar,
        liked_at -> Timestamptz,
    }
}

diesel::joinable!(photo_tags -> photos (photo_id));
diesel::joinable!(photo_likes -> photos (photo_id));

diesel::allow_tables_to_appear_in_same_query!(guests, photos, photo_tags, photo_likes);
