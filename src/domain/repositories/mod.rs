//! Repository trait definitions for the domain layer.
//!
//! These traits are the ports the core consumes. Concrete implementations live
//! in `crate::infrastructure::persistence`; mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`ClickRepository`] - Link id resolution and click persistence
//! - [`ClickStatsRepository`] - Total, unique and daily click counts
//! - [`LinkResolver`] - Short code to destination URL lookup

pub mod click_repository;
pub mod click_stats_repository;
pub mod link_repository;

pub use click_repository::ClickRepository;
pub use click_stats_repository::{ClickStats, ClickStatsRepository, DailyClickStats};
pub use link_repository::LinkResolver;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkResolver;

/// Errors returned by repository implementations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("link not found: {0}")]
    LinkNotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Returns `true` for lookups that failed because the code is unknown.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::LinkNotFound(_))
    }
}
