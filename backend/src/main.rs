//! Backend entry-point: loads settings, wires services and starts the HTTP server.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use notekeeper::inbound::http::health::HealthState;
use notekeeper::inbound::http::session_config::{BuildMode, session_settings_from_env};
use server::{
    ServerConfig, ServerSettings, build_app_services, create_server, seed_demo_data_on_startup,
};

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

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid NOTEKEEPER_BIND_ADDR: {e}"),
        )
    })?;
    let hasher = settings
        .hasher()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %session.key_fingerprint(),
        ttl_hours = session.ttl_hours,
        "session key loaded"
    );

    let services = build_app_services(Arc::new(hasher), Arc::new(DefaultClock))
        .map_err(|e| std::io::Error::other(format!("failed to wire services: {e}")))?;
    match seed_demo_data_on_startup(settings.seed_demo_data, &services).await {
        Ok(Some(summary)) => info!(
            accounts_created = summary.accounts_created,
            accounts_skipped = summary.accounts_skipped,
            notes_created = summary.notes_created,
            "demo data seeded"
        ),
        Ok(None) => {}
        Err(e) => return Err(std::io::Error::other(format!("demo data seeding failed: {e}"))),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        services.http,
        ServerConfig::new(session, bind_addr),
    )?;
    info!(%bind_addr, "server listening");
    server.await
}
