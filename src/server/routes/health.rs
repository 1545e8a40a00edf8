//! Health check endpoints

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("", web::get().to(health_check))
            .route("/detailed", web::get().to(detailed_health_check)),
    );
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: Cow<'static, str>,
    timestamp: chrono::DateTime<chrono::Utc>,
    version: Cow<'static, str>,
}

/// Deletion pipeline snapshot
#[derive(Debug, Serialize)]
struct PipelineStatus {
    queued: usize,
    capacity: usize,
    accepting: bool,
    executed: u64,
    failed: u64,
    discarded: u64,
    links: usize,
}

/// Liveness check
pub async fn health_check() -> HttpResponse {
    debug!("Health check requested");

    HttpResponse::Ok().json(ApiResponse::success(HealthStatus {
        status: Cow::Borrowed("healthy"),
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
    }))
}

/// Queue depth and worker counters; 503 once the pool has shut down
async fn detailed_health_check(state: web::Data<AppState>) -> HttpResponse {
    if state.queue.is_closed() {
        return HttpResponse::ServiceUnavailable()
            .json(ApiResponse::<PipelineStatus>::error("Deletion queue is closed"));
    }

    let stats = &state.pool_stats;
    HttpResponse::Ok().json(ApiResponse::success(PipelineStatus {
        queued: state.queue.len(),
        capacity: state.queue.capacity(),
        accepting: true,
        executed: stats.executed(),
        failed: stats.failed(),
        discarded: stats.discarded(),
        links: state.store.len(),
    }))
}
