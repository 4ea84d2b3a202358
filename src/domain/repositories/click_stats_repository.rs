//! Read-side port for aggregated click statistics.

use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Default window for daily statistics, in days.
pub const DEFAULT_STATS_DAYS: u32 = 7;
/// Largest accepted window for daily statistics, in days.
pub const MAX_STATS_DAYS: u32 = 90;

/// Click totals for a single short link.
///
/// `unique_clicks` counts distinct client addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickStats {
    pub short_code: String,
    pub total_clicks: i64,
    pub unique_clicks: i64,
}

/// Number of clicks recorded on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyClickStats {
    pub date: NaiveDate,
    pub clicks: i64,
}

/// Aggregations over the clicks written by the worker pool.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickStatsRepository: Send + Sync {
    /// Returns total and unique click counts for a short code.
    ///
    /// A link without clicks yields zero counts.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::LinkNotFound`] if no link uses `short_code`.
    /// Returns [`RepositoryError::Database`] on database errors.
    async fn click_stats(&self, short_code: &str) -> Result<ClickStats, RepositoryError>;

    /// Returns per-day click counts for the last `days` days, newest first.
    ///
    /// Days without clicks are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::LinkNotFound`] if no link uses `short_code`.
    /// Returns [`RepositoryError::Database`] on database errors.
    async fn daily_click_stats(
        &self,
        short_code: &str,
        days: u32,
    ) -> Result<Vec<DailyClickStats>, RepositoryError>;
}
