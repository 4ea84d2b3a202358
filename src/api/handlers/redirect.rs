//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect},
};
use serde_json::json;
use std::net::SocketAddr;
use tracing::debug;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;
use crate::utils::short_code::validate_short_code;

/// Country code header set by Cloudflare and compatible CDNs.
const COUNTRY_HEADER: &str = "cf-ipcountry";

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Validate the short code format
/// 2. Resolve the destination through the link resolver
/// 3. Submit a click event to the click queue (never waits)
/// 4. Return 307 Temporary Redirect
///
/// # Click Tracking
///
/// Click events are best-effort. A full queue drops the event; a closed
/// queue (during shutdown) is logged at debug level. Neither affects the
/// redirect.
///
/// # Errors
///
/// Returns 400 Bad Request for malformed codes and 404 Not Found for unknown
/// or expired links.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    validate_short_code(&code)?;

    let target = state
        .link_resolver
        .find_target_url(&code)
        .await?
        .ok_or_else(|| AppError::not_found("Link not found or expired", json!({ "code": code })))?;

    let click_event = ClickEvent::new(
        code,
        Some(client_ip(&headers, peer, state.behind_proxy).to_string()),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    )
    .with_country(headers.get(COUNTRY_HEADER).and_then(|v| v.to_str().ok()));

    if let Err(e) = state.click_ingestor.submit(click_event) {
        debug!(error = %e, "click not recorded");
    }

    Ok(Redirect::temporary(&target))
}
