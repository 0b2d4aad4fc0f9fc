//! Application wiring shared by integration test crates.
//!
//! Integration tests compile as separate crates and only see the public
//! surface, so the server is assembled here exactly as `create_server` does,
//! with every adapter left to its in-memory fallback.

use std::sync::Arc;

use actix_web::web;
use backend::domain::ports::FixtureObjectStore;
use backend::inbound::http::health::HealthState;
use backend::server::{AppDependencies, ServerConfig, build_states};

/// Dependencies for [`backend::server::build_app`] plus handles on the fakes.
pub struct TestApp {
    pub deps: AppDependencies,
    pub store: Arc<FixtureObjectStore>,
}

/// Build dependencies with the given WebSocket origin allow-list.
pub fn test_app(allowed_origins: &[&str]) -> TestApp {
    let store = Arc::new(FixtureObjectStore::default());
    let config = ServerConfig::new(([127, 0, 0, 1], 0).into())
        .with_object_store(store.clone())
        .with_allowed_origins(allowed_origins.iter().map(|&o| o.to_owned()).collect());
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    TestApp {
        deps: AppDependencies::new(health, build_states(&config)),
        store,
    }
}
