//! Handlers for per-link click statistics.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::dto::click_stats::{ClickStatsResponse, DailyClickStatsItem, DailyStatsQuery};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::short_code::validate_short_code;

/// Returns total and unique click counts for a short link.
///
/// # Endpoint
///
/// `GET /api/v1/links/{code}/stats`
///
/// # Response
///
/// ```json
/// { "short_code": "abc123", "total_clicks": 42, "unique_clicks": 17 }
/// ```
///
/// Counts only include clicks the worker pool has already persisted.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn click_stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ClickStatsResponse>, AppError> {
    validate_short_code(&code)?;

    let stats = state.click_stats.click_stats(&code).await?;

    Ok(Json(stats.into()))
}

/// Returns per-day click counts for a short link, newest day first.
///
/// # Endpoint
///
/// `GET /api/v1/links/{code}/stats/daily?days=7`
///
/// # Query Parameters
///
/// - `days` (optional): Window size, 1 to 90 (default: 7). Invalid values
///   use the default.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn daily_click_stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<DailyStatsQuery>,
) -> Result<Json<Vec<DailyClickStatsItem>>, AppError> {
    validate_short_code(&code)?;

    let daily = state
        .click_stats
        .daily_click_stats(&code, query.days())
        .await?;

    Ok(Json(daily.into_iter().map(Into::into).collect()))
}
