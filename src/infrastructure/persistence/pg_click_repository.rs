//! PostgreSQL implementation of the click persistence and statistics ports.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::ClickRecord;
use crate::domain::repositories::{
    ClickRepository, ClickStats, ClickStatsRepository, DailyClickStats, RepositoryError,
};
use chrono::NaiveDate;

/// PostgreSQL repository used by the click workers and the statistics endpoints.
///
/// Statements are bound at runtime so the crate builds without a live
/// database or an offline query cache.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn resolve_link_id(&self, short_code: &str) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM links WHERE short_code = $1")
            .bind(short_code)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| RepositoryError::LinkNotFound(short_code.to_string()))
    }

    async fn record_click(&self, record: &ClickRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO clicks (link_id, ip_address, user_agent, referer, country, clicked_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.link_id)
        .bind(record.ip_address.as_deref())
        .bind(record.user_agent.as_deref())
        .bind(record.referer.as_deref())
        .bind(record.country.as_deref())
        .bind(record.clicked_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ClickStatsRepository for PgClickRepository {
    async fn click_stats(&self, short_code: &str) -> Result<ClickStats, RepositoryError> {
        let (total_clicks, unique_clicks) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(c.id), COUNT(DISTINCT c.ip_address)
            FROM links l
            LEFT JOIN clicks c ON c.link_id = l.id
            WHERE l.short_code = $1
            GROUP BY l.id
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or_else(|| RepositoryError::LinkNotFound(short_code.to_string()))?;

        Ok(ClickStats {
            short_code: short_code.to_string(),
            total_clicks,
            unique_clicks,
        })
    }

    async fn daily_click_stats(
        &self,
        short_code: &str,
        days: u32,
    ) -> Result<Vec<DailyClickStats>, RepositoryError> {
        let link_id = self.resolve_link_id(short_code).await?;
        let days = i32::try_from(days).unwrap_or(i32::MAX);

        let rows = sqlx::query_as::<_, (NaiveDate, i64)>(
            r#"
            SELECT (clicked_at AT TIME ZONE 'UTC')::date AS day, COUNT(*)
            FROM clicks
            WHERE link_id = $1
              AND clicked_at >= NOW() - make_interval(days => $2)
            GROUP BY day
            ORDER BY day DESC
            "#,
        )
        .bind(link_id)
        .bind(days)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(date, clicks)| DailyClickStats { date, clicks })
            .collect())
    }
}
