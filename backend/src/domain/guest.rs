//! RSVP guests: submissions, companions and stored records.
//!
//! Wire names follow the invitation site's form fields, so payloads keep the
//! Spanish keys (`nombre_completo`, `asistira`, ...) while the Rust fields use
//! English names. A few English aliases are accepted on input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Longest accepted guest or companion name, in characters.
pub const MAX_NAME_CHARS: usize = 255;
/// Largest number of companions accepted in one submission.
pub const MAX_COMPANIONS: usize = 20;

/// Server-assigned guest identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct GuestId(i64);

impl GuestId {
    /// Wrap a database identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for GuestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Answers shared by principals and companions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GuestProfile {
    /// Full name as typed by the guest.
    #[serde(rename = "nombre_completo", alias = "name", default)]
    pub full_name: String,
    /// Whether the guest will attend.
    #[serde(rename = "asistira", alias = "attending", default)]
    pub attending: bool,
    /// Companions announced by the principal; informational only.
    #[serde(rename = "numero_acompanantes", alias = "companions", default)]
    pub companion_count: u32,
    /// Dietary restrictions.
    #[serde(rename = "restricciones", default)]
    pub restrictions: String,
    /// Whether the guest takes the shuttle bus.
    #[serde(rename = "asistencia_autobus", default)]
    pub bus_attendance: bool,
    /// Which bus run the guest takes.
    #[serde(rename = "tipo_autobus", default)]
    pub bus_type: String,
    /// Song request for the party.
    #[serde(rename = "cancion_preferencia", default)]
    pub song_preference: String,
    /// Streaming platform the song was picked from.
    #[serde(rename = "plataforma_musica", default)]
    pub music_platform: String,
    /// Free-text message for the couple.
    #[serde(rename = "mensaje_para_novios", default)]
    pub message: String,
    /// Colour tag used by the seating board.
    #[serde(default)]
    pub color: String,
}

/// Companion entry nested in a principal's submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompanionSubmission {
    #[serde(rename = "nombre_completo", alias = "name", default)]
    pub full_name: String,
    #[serde(rename = "restricciones", default)]
    pub restrictions: String,
    #[serde(rename = "asistencia_autobus", default)]
    pub bus_attendance: bool,
    #[serde(rename = "tipo_autobus", default)]
    pub bus_type: String,
    #[serde(rename = "cancion_preferencia", default)]
    pub song_preference: String,
    #[serde(rename = "plataforma_musica", default)]
    pub music_platform: String,
    #[serde(default)]
    pub color: String,
}

impl CompanionSubmission {
    /// Build the stored profile for this companion.
    ///
    /// Companions inherit the principal's attendance answer, never announce
    /// companions of their own and carry no message.
    pub fn to_profile(&self, principal: &GuestProfile) -> GuestProfile {
        GuestProfile {
            full_name: self.full_name.trim().to_owned(),
            attending: principal.attending,
            companion_count: 0,
            restrictions: self.restrictions.clone(),
            bus_attendance: self.bus_attendance,
            bus_type: self.bus_type.clone(),
            song_preference: self.song_preference.clone(),
            music_platform: self.music_platform.clone(),
            message: String::new(),
            color: self.color.clone(),
        }
    }
}

/// Full RSVP form as submitted over HTTP or the realtime channel.
///
/// # Examples
/// ```
/// use backend::domain::GuestSubmission;
///
/// let submission: GuestSubmission =
///     serde_json::from_str(r#"{"nombre_completo": "Ana", "asistira": true}"#).unwrap();
/// assert!(submission.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GuestSubmission {
    #[serde(flatten)]
    pub profile: GuestProfile,
    /// Address for the confirmation email; optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "acompanantes", default)]
    pub companions: Vec<CompanionSubmission>,
}

/// Reasons a guest submission is rejected before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuestValidationError {
    #[error("full name must not be empty")]
    EmptyName,
    #[error("full name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("companion {index} is missing a name")]
    EmptyCompanionName { index: usize },
    #[error("at most {max} companions may be submitted")]
    TooManyCompanions { max: usize },
    #[error("email address `{email}` is not valid")]
    InvalidEmail { email: String },
}

impl GuestSubmission {
    /// Check the invariants every stored guest must satisfy.
    pub fn validate(&self) -> Result<(), GuestValidationError> {
        validate_name(&self.profile.full_name)?;
        if self.companions.len() > MAX_COMPANIONS {
            return Err(GuestValidationError::TooManyCompanions {
                max: MAX_COMPANIONS,
            });
        }
        for (index, companion) in self.companions.iter().enumerate() {
            validate_name(&companion.full_name).map_err(|err| match err {
                GuestValidationError::EmptyName => GuestValidationError::EmptyCompanionName { index },
                other => other,
            })?;
        }
        if let Some(email) = self.email() {
            if !email.contains('@') {
                return Err(GuestValidationError::InvalidEmail {
                    email: email.to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Trimmed email address, ignoring blank input.
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }

    /// Principal profile with the name trimmed, ready for storage.
    pub fn principal_profile(&self) -> GuestProfile {
        GuestProfile {
            full_name: self.profile.full_name.trim().to_owned(),
            ..self.profile.clone()
        }
    }
}

fn validate_name(name: &str) -> Result<(), GuestValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GuestValidationError::EmptyName);
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(GuestValidationError::NameTooLong {
            max: MAX_NAME_CHARS,
        });
    }
    Ok(())
}

/// Guest row handed to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuest {
    pub profile: GuestProfile,
    pub responded_at: DateTime<Utc>,
}

/// Stored guest, principal or companion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GuestRecord {
    pub id: GuestId,
    #[serde(flatten)]
    pub profile: GuestProfile,
    /// Set for companions; references the principal stored in the same
    /// submission.
    #[serde(rename = "invitado_principal_id")]
    pub principal_id: Option<GuestId>,
    #[serde(rename = "fecha_respuesta")]
    pub responded_at: DateTime<Utc>,
}

/// Outcome of a guest submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestReceipt {
    /// Identifier of the stored principal guest.
    pub id: GuestId,
    /// Companions stored successfully.
    pub companions_saved: usize,
    /// Companions that failed to store; the principal is kept regardless.
    pub companion_failures: usize,
}
