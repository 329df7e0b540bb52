//! Health endpoint reporting readiness and store occupancy.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Envelope, SuccessKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Readiness flag flipped once the server is bound.
#[derive(Debug, Default)]
pub struct HealthState {
    ready: AtomicBool,
}

impl HealthState {
    /// Create a state that starts as not ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

/// Payload of the health envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HealthReport {
    /// `ok` once ready, `starting` before.
    #[schema(example = "ok")]
    pub status: String,
    /// Live user count.
    #[schema(example = 3)]
    pub users: usize,
    /// Maximum number of users.
    #[schema(example = 999)]
    pub capacity: usize,
}

/// Report readiness and store occupancy. Returns 503 until the server is ready.
#[utoipa::path(
    get,
    path = "/health",
    tags = ["health"],
    responses(
        (status = 200, description = "Service is ready", body = HealthReport),
        (status = 503, description = "Service is starting", body = HealthReport)
    )
)]
#[get("/health")]
pub async fn health(
    health: web::Data<HealthState>,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let ready = health.is_ready();
    let store = state.users.clone();
    let users = web::block(move || store.len()).await?;
    let report = HealthReport {
        status: (if ready { "ok" } else { "starting" }).to_owned(),
        users,
        capacity: state.users.capacity(),
    };
    let mut response = if ready {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    Ok(response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(Envelope::success(SuccessKind::Healthy, report)))
}
