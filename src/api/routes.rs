//! Versioned API route configuration.
//!
//! API routes are rate limited per API key (see
//! [`crate::api::middleware::rate_limit::by_api_key`]).

use crate::api::handlers::{click_stats_handler, daily_click_stats_handler, queue_stats_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// API endpoints, nested under `/api/v1`.
///
/// # Endpoints
///
/// - `GET /clicks/queue` - Click queue capacity, occupancy and worker count
/// - `GET /links/{code}/stats` - Total and unique clicks
/// - `GET /links/{code}/stats/daily` - Clicks per day
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/clicks/queue", get(queue_stats_handler))
        .route("/links/{code}/stats", get(click_stats_handler))
        .route("/links/{code}/stats/daily", get(daily_click_stats_handler))
}
