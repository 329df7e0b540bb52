//! User registry entry-point: loads settings, restores the store and serves
//! the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppSettings, ServerConfig, build_store, create_server};
use user_registry::inbound::http::health::HealthState;

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

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let config = ServerConfig::try_from(&settings).map_err(std::io::Error::other)?;
    let store = build_store(&config)?;

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, store, &config)?.await
}
