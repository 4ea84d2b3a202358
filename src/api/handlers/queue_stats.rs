//! Handler for click queue statistics.

use axum::{Json, extract::State};

use crate::api::dto::queue::QueueStatsResponse;
use crate::state::AppState;

/// Returns the click queue capacity, occupancy and worker count.
///
/// # Endpoint
///
/// `GET /api/v1/clicks/queue`
///
/// # Response
///
/// ```json
/// {
///   "queue_capacity": 1000,
///   "queue_occupancy": 4,
///   "worker_count": 3,
///   "running_workers": 3,
///   "closed": false
/// }
/// ```
pub async fn queue_stats_handler(State(state): State<AppState>) -> Json<QueueStatsResponse> {
    Json(QueueStatsResponse {
        stats: state.click_workers.queue_stats(),
        running_workers: state.click_workers.running_workers(),
        closed: state.click_ingestor.is_closed(),
    })
}
