//! Business logic services for the application layer.

pub mod rate_limiter;

pub use rate_limiter::{CleanupTask, RateLimiter, RateLimiterConfig, RateLimiterError};
