//! Persistence port consumed by the click workers.

use crate::domain::entities::ClickRecord;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;

/// Storage operations the click pipeline depends on.
///
/// Implemented by the storage layer; the worker pool only calls it.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Resolves the numeric link id for a short code.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::LinkNotFound`] if no link uses `short_code`.
    /// Returns [`RepositoryError::Database`] on database errors.
    async fn resolve_link_id(&self, short_code: &str) -> Result<i64, RepositoryError>;

    /// Persists a single click.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] on database errors. Callers treat
    /// every error as transient.
    async fn record_click(&self, record: &ClickRecord) -> Result<(), RepositoryError>;
}
