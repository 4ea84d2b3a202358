mod common;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use linkpulse::routes::app_router;
use std::net::SocketAddr;
use tower::ServiceExt;

fn request(uri: &str) -> Request<Body> {
    let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
    let mut req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    req.extensions_mut().insert(ConnectInfo(peer));
    req
}

#[tokio::test]
async fn test_redirect_route() {
    let (state, queue) = common::default_test_state();

    let response = app_router(state).oneshot(request("/abc123")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(queue.len(), 1);
}

#[tokio::test]
async fn test_trailing_slash_is_trimmed() {
    let (state, _queue) = common::default_test_state();

    let response = app_router(state).oneshot(request("/health/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_api_routes_are_nested() {
    let (state, _queue) = common::default_test_state();

    let response = app_router(state)
        .oneshot(request("/api/v1/clicks/queue"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["queue_capacity"], 16);
}

#[tokio::test]
async fn test_public_routes_are_rate_limited() {
    let (state, _queue) = common::create_test_state(
        std::sync::Arc::new(common::RecordingClickRepository::new()),
        common::limiter_config(1.0, 1),
        false,
    );
    let app = app_router(state);

    let first = app.clone().oneshot(request("/health")).await.unwrap();
    let second = app.oneshot(request("/abc123")).await.unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_click_stats_routes_are_nested() {
    let (state, _queue) = common::default_test_state();
    let app = app_router(state);

    let totals = app
        .clone()
        .oneshot(request("/api/v1/links/abc123/stats"))
        .await
        .unwrap();
    let daily = app
        .oneshot(request("/api/v1/links/abc123/stats/daily?days=3"))
        .await
        .unwrap();

    assert_eq!(totals.status(), StatusCode::OK);
    assert_eq!(daily.status(), StatusCode::OK);
}
