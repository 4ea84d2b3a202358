//! PostgreSQL repository implementations.
//!
//! # Repositories
//!
//! - [`PgClickRepository`] - Link id resolution and click inserts for the worker pool
//! - [`PgLinkRepository`] - Redirect target lookup

pub mod pg_click_repository;
pub mod pg_link_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
