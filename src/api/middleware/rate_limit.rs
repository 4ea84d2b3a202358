//! Rate limiting middleware backed by the keyed token bucket limiter.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::{api_key, client_ip};

const REJECTION_MESSAGE: &str = "Too many requests, please try again later";

/// Limits requests per client address.
///
/// The address is the socket peer, or the forwarded address when the
/// service runs behind a trusted proxy (see [`AppState::behind_proxy`]).
///
/// # Limits
///
/// Taken from the shared [`crate::application::services::RateLimiter`]
/// (default: 10 requests per second, burst of 20).
///
/// # Errors
///
/// Returns `429 Too Many Requests` with a `Retry-After` header when the
/// client's bucket is empty.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/{code}", get(redirect_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit::by_client_ip));
/// ```
pub async fn by_client_ip(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_ip(req.headers(), peer, state.behind_proxy).to_string();

    if !state.rate_limiter.admit(&client) {
        return Err(rejection(&state));
    }

    Ok(next.run(req).await)
}

/// Limits requests per API key, falling back to the client address for
/// requests that carry no key.
///
/// The key is read from `X-API-Key`, `Authorization: Bearer`, or the
/// `api_key` query parameter. Validating the key is not this layer's job.
pub async fn by_api_key(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_ip(req.headers(), peer, state.behind_proxy).to_string();

    let admitted = state
        .rate_limiter
        .admit_with(|| api_key(req.headers(), req.uri()), &client);

    if !admitted {
        return Err(rejection(&state));
    }

    Ok(next.run(req).await)
}

fn rejection(state: &AppState) -> AppError {
    AppError::too_many_requests(REJECTION_MESSAGE, state.rate_limiter.retry_after().as_secs())
}
