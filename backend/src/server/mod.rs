//! Server construction: store bootstrap, app wiring and binding.

mod config;

pub use config::{AppSettings, ServerConfig};

use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{HttpServer, web};
use tracing::info;
use user_registry::domain::UserStore;
use user_registry::domain::ports::{NoOpUserSnapshotRepository, UserSnapshotRepository};
use user_registry::inbound::http::build_app;
use user_registry::inbound::http::health::HealthState;
use user_registry::inbound::http::state::HttpState;
use user_registry::outbound::persistence::JsonFileUserSnapshotRepository;

#[cfg(debug_assertions)]
use user_registry::doc::ApiDoc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Build the user store, loading any existing snapshot.
///
/// # Errors
/// Returns [`std::io::Error`] when the snapshot file cannot be opened, read or
/// decoded, or when its contents break a collection invariant.
pub fn build_store(config: &ServerConfig) -> std::io::Result<UserStore> {
    let snapshots: Arc<dyn UserSnapshotRepository> = match &config.data_file {
        Some(path) => {
            let repo = JsonFileUserSnapshotRepository::open(path).map_err(std::io::Error::other)?;
            info!(path = repo.display_path(), "persisting users to JSON file");
            Arc::new(repo)
        }
        None => {
            info!("persistence disabled; users live in memory only");
            Arc::new(NoOpUserSnapshotRepository)
        }
    };
    UserStore::load(snapshots, config.id_allocation).map_err(std::io::Error::other)
}

/// Construct an Actix HTTP server around `store`.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    store: UserStore,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(HttpState::new(Arc::new(store)));

    let server = HttpServer::new(move || {
        let app = build_app(http_state.clone(), server_health_state.clone());

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(config.bind_addr)?
    .run();

    info!(addr = %config.bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
