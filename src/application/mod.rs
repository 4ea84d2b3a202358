//! Application layer services.
//!
//! # Available Services
//!
//! - [`services::rate_limiter::RateLimiter`] - Per-key token bucket admission control
//!   with a stoppable idle-bucket sweep

pub mod services;
