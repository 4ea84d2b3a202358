//! Read-only view of the link store used by the redirect path.

use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;

/// Resolves short codes to their destination URLs.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkResolver: Send + Sync {
    /// Finds the original URL of an active link.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` if the link exists and has not expired
    /// - `Ok(None)` otherwise
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] on database errors.
    async fn find_target_url(&self, short_code: &str) -> Result<Option<String>, RepositoryError>;
}
