//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`                - Short link redirect (public)
//! - `GET  /health`                - Health check: click queue, rate limiter (public)
//! - `GET  /api/v1/clicks/queue`   - Click queue statistics
//! - `GET  /api/v1/links/{code}/stats`       - Total and unique clicks
//! - `GET  /api/v1/links/{code}/stats/daily` - Clicks per day
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-client token bucket on public routes, per-API-key on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// Client addresses honour [`AppState::behind_proxy`].
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let public = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::by_client_ip,
        ));

    let api_router = api::routes::api_routes().route_layer(
        middleware::from_fn_with_state(state.clone(), rate_limit::by_api_key),
    );

    let router = Router::new()
        .merge(public)
        .nest("/api/v1", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
