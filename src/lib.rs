//! # linkpulse
//!
//! Redirect service for shortened URLs with asynchronous click analytics and
//! per-client rate limiting, built with Axum and PostgreSQL.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Click events, persistence ports, click queue and worker pool
//! - **Application Layer** ([`application`]) - Keyed token bucket rate limiter
//! - **Infrastructure Layer** ([`infrastructure`]) - PostgreSQL adapters
//! - **API Layer** ([`api`]) - HTTP handlers, DTOs, and middleware
//!
//! ## Click Pipeline
//!
//! Redirect handlers submit click events to a bounded queue and never wait on
//! it: when the queue is full the event is dropped with a warning. A fixed
//! pool of workers resolves each event's link id and persists it, retrying
//! failed writes with a linear backoff.
//!
//! ## Rate Limiting
//!
//! Every client address (or API key on `/api`) gets its own token bucket,
//! created on first use and evicted after three idle cleanup intervals.
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{RateLimiter, RateLimiterConfig};
    pub use crate::domain::click_event::ClickEvent;
    pub use crate::domain::click_queue::{ClickIngestor, ClickQueue, Submission, SubmitError, click_queue};
    pub use crate::domain::click_worker::{ClickWorkerPool, QueueStats, WorkerSettings};
    pub use crate::domain::entities::ClickRecord;
    pub use crate::domain::repositories::{
        ClickRepository, ClickStats, ClickStatsRepository, DailyClickStats, LinkResolver,
        RepositoryError,
    };
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
