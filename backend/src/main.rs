//! Backend entry-point: loads settings, applies migrations, wires adapters
//! and serves REST, the realtime socket and OpenAPI docs.

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::ports::{FixtureObjectStore, ObjectStore};
use backend::inbound::http::health::HealthState;
use backend::outbound::notify::SmtpNotifier;
use backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use backend::outbound::storage::S3ObjectStore;
use backend::outbound::thumbnail::ImageThumbnailer;
use backend::server::{ServerConfig, create_server};
use backend::settings::AppSettings;

async fn object_store(settings: &AppSettings) -> Arc<dyn ObjectStore> {
    match settings.s3() {
        Some(config) => {
            info!(bucket = %config.bucket, region = %config.region, "using S3 object storage");
            Arc::new(S3ObjectStore::from_env(config).await)
        }
        None => {
            warn!("no S3 bucket configured; photos are kept in memory only");
            Arc::new(FixtureObjectStore::default())
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load_from_iter(std::env::args_os()).map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let database_url = settings.database_url().map_err(std::io::Error::other)?;

    run_migrations(database_url)
        .await
        .map_err(std::io::Error::other)?;
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(std::io::Error::other)?;

    let smtp = settings.smtp().map_err(std::io::Error::other)?;
    let notifier = SmtpNotifier::new(&smtp).map_err(std::io::Error::other)?;
    if !notifier.is_enabled() {
        warn!("no SMTP host configured; RSVP emails are logged and dropped");
    }

    let config = ServerConfig::new(bind_addr)
        .with_db_pool(pool)
        .with_object_store(object_store(&settings).await)
        .with_thumbnails(Arc::new(ImageThumbnailer::new(settings.thumbnail())))
        .with_notifier(Arc::new(notifier))
        .with_operators(settings.operator_emails())
        .with_upload_policy(settings.upload_policy())
        .with_allowed_origins(settings.allowed_origins());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "wedding backend listening");
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome
}
