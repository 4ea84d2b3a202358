//! PostgreSQL implementation of the link resolver.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::{LinkResolver, RepositoryError};

/// PostgreSQL lookup of redirect targets.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkResolver for PgLinkRepository {
    async fn find_target_url(&self, short_code: &str) -> Result<Option<String>, RepositoryError> {
        let url = sqlx::query_scalar::<_, String>(
            r#"
            SELECT original_url
            FROM links
            WHERE short_code = $1
              AND (expires_at IS NULL OR expires_at > NOW())
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(url)
    }
}
