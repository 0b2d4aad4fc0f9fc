//! Application settings loaded via OrthoConfig.
//!
//! Every value can come from CLI flags, `WEDDING_*` environment variables or
//! a configuration file. Optional values fall back to the defaults exposed
//! by the accessor methods.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::UploadPolicy;
use crate::outbound::notify::SmtpConfig;
use crate::outbound::storage::S3StoreConfig;
use crate::outbound::thumbnail::ThumbnailConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_S3_REGION: &str = "eu-west-1";
const DEFAULT_SMTP_PORT: u16 = 587;

/// Runtime configuration for the wedding backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WEDDING")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; required to run the server.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Bucket holding originals and thumbnails. Without one, objects stay
    /// in memory.
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    /// Public base URL (for example a CDN) used instead of the bucket host.
    pub s3_public_base_url: Option<String>,
    /// SMTP relay host. Without one, emails are logged and dropped.
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    /// Sender mailbox, for example `Boda <novios@example.com>`.
    pub smtp_from: Option<String>,
    /// Use STARTTLS instead of implicit TLS.
    #[ortho_config(default = true)]
    pub smtp_starttls: bool,
    /// Comma separated addresses copied on every RSVP.
    pub operator_emails: Option<String>,
    /// Largest accepted image upload in bytes.
    pub max_upload_bytes: Option<usize>,
    /// Edge length of the square thumbnail in pixels.
    pub thumbnail_size: Option<u32>,
    /// JPEG quality of thumbnails, 1 to 100.
    pub thumbnail_quality: Option<u8>,
    /// Comma separated origins allowed to open the realtime socket. Empty
    /// allows every origin.
    pub allowed_origins: Option<String>,
}

/// Invalid setting values detected after loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("bind_addr `{value}` is not a socket address")]
    BindAddr { value: String },
    #[error("database_url is required")]
    MissingDatabaseUrl,
    #[error("smtp_from is required when smtp_host is set")]
    MissingSender,
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|value| value.trim()).filter(|value| !value.is_empty())
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = non_blank(self.bind_addr.as_ref()).unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    /// # Errors
    /// Returns [`SettingsError::MissingDatabaseUrl`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        non_blank(self.database_url.as_ref()).ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .filter(|max| *max > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Object store settings, or `None` when no bucket is configured.
    pub fn s3(&self) -> Option<S3StoreConfig> {
        let bucket = non_blank(self.s3_bucket.as_ref())?;
        Some(S3StoreConfig {
            bucket: bucket.to_owned(),
            region: non_blank(self.s3_region.as_ref())
                .unwrap_or(DEFAULT_S3_REGION)
                .to_owned(),
            public_base_url: non_blank(self.s3_public_base_url.as_ref()).map(str::to_owned),
        })
    }

    /// SMTP settings. A blank host yields a config the notifier treats as
    /// disabled.
    ///
    /// # Errors
    /// Returns [`SettingsError::MissingSender`] when a host is set without a
    /// sender address.
    pub fn smtp(&self) -> Result<SmtpConfig, SettingsError> {
        let host = non_blank(self.smtp_host.as_ref()).unwrap_or_default();
        let from = non_blank(self.smtp_from.as_ref()).unwrap_or_default();
        if !host.is_empty() && from.is_empty() {
            return Err(SettingsError::MissingSender);
        }
        Ok(SmtpConfig {
            host: host.to_owned(),
            port: self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
            username: non_blank(self.smtp_username.as_ref()).map(str::to_owned),
            password: self.smtp_password.clone(),
            from: from.to_owned(),
            starttls: self.smtp_starttls,
        })
    }

    pub fn operator_emails(&self) -> Vec<String> {
        split_list(self.operator_emails.as_deref())
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_bytes: self
                .max_upload_bytes
                .filter(|max| *max > 0)
                .unwrap_or(UploadPolicy::DEFAULT_MAX_BYTES),
        }
    }

    pub fn thumbnail(&self) -> ThumbnailConfig {
        let defaults = ThumbnailConfig::default();
        ThumbnailConfig {
            size: self.thumbnail_size.filter(|size| *size > 0).unwrap_or(defaults.size),
            quality: self
                .thumbnail_quality
                .map(|quality| quality.clamp(1, 100))
                .unwrap_or(defaults.quality),
        }
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        split_list(self.allowed_origins.as_deref())
    }
}
