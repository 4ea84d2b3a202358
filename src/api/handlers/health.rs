//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse, QueueCheck};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: The click queue has been closed
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "click_queue": {
///       "status": "ok",
///       "message": "3 of 3 workers running",
///       "stats": { "queue_capacity": 1000, "queue_occupancy": 0, "worker_count": 3 }
///     },
///     "rate_limiter": { "status": "ok", "message": "12 tracked keys" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let queue_check = check_click_queue(&state);
    let limiter_check = CheckStatus {
        status: "ok".to_string(),
        message: Some(format!("{} tracked keys", state.rate_limiter.tracked_keys())),
    };

    let healthy = queue_check.status.status == "ok";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            click_queue: queue_check,
            rate_limiter: limiter_check,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks if the click tracking queue still accepts events.
fn check_click_queue(state: &AppState) -> QueueCheck {
    let stats = state.click_workers.queue_stats();

    let status = if state.click_ingestor.is_closed() {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Click queue is closed".to_string()),
        }
    } else {
        CheckStatus {
            status: "ok".to_string(),
            message: Some(format!(
                "{} of {} workers running",
                state.click_workers.running_workers(),
                stats.worker_count
            )),
        }
    };

    QueueCheck { status, stats }
}
