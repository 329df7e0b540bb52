//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`build_app`] assembles the full application: the `/api` scope, the health
//! endpoint, JSON body validation, request tracing and the not-found fallback.

pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;
use health::HealthState;
use state::HttpState;

/// Register the user routes under `/api` plus the health endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(users::list_users)
            .service(users::get_user)
            .service(users::create_user)
            .service(users::put_user)
            .service(users::patch_user)
            .service(users::delete_user),
    )
    .service(health::health);
}

/// Build the application around shared state.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use actix_web::web;
/// use user_registry::domain::UserStore;
/// use user_registry::inbound::http::{build_app, health::HealthState, state::HttpState};
///
/// let state = web::Data::new(HttpState::new(Arc::new(UserStore::in_memory())));
/// let _app = build_app(state, web::Data::new(HealthState::new()));
/// ```
pub fn build_app(
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(http_state)
        .app_data(health_state)
        .app_data(validation::json_config())
        .wrap(Trace)
        .configure(configure)
        .default_service(web::to(validation::route_not_found))
}
