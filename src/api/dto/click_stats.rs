//! DTOs for click statistics endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::repositories::{
    ClickStats, DailyClickStats,
    click_stats_repository::{DEFAULT_STATS_DAYS, MAX_STATS_DAYS},
};

/// Total and unique clicks for one short link.
#[derive(Debug, Serialize)]
pub struct ClickStatsResponse {
    pub short_code: String,
    pub total_clicks: i64,
    pub unique_clicks: i64,
}

impl From<ClickStats> for ClickStatsResponse {
    fn from(stats: ClickStats) -> Self {
        Self {
            short_code: stats.short_code,
            total_clicks: stats.total_clicks,
            unique_clicks: stats.unique_clicks,
        }
    }
}

/// Clicks on a single day, serialized as `{"date": "2025-03-01", "clicks": 12}`.
#[derive(Debug, Serialize)]
pub struct DailyClickStatsItem {
    pub date: NaiveDate,
    pub clicks: i64,
}

impl From<DailyClickStats> for DailyClickStatsItem {
    fn from(stats: DailyClickStats) -> Self {
        Self {
            date: stats.date,
            clicks: stats.clicks,
        }
    }
}

/// Query parameters for daily statistics.
///
/// `days` is kept as raw text so that malformed values fall back to the
/// default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct DailyStatsQuery {
    pub days: Option<String>,
}

impl DailyStatsQuery {
    /// Requested window, or [`DEFAULT_STATS_DAYS`] when missing, malformed or
    /// outside `1..=MAX_STATS_DAYS`.
    pub fn days(&self) -> u32 {
        self.days
            .as_deref()
            .and_then(|d| d.trim().parse::<u32>().ok())
            .filter(|d| (1..=MAX_STATS_DAYS).contains(d))
            .unwrap_or(DEFAULT_STATS_DAYS)
    }
}
