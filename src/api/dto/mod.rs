//! Data Transfer Objects for API responses.
//!
//! All DTOs use Serde for JSON serialization.

pub mod click_stats;
pub mod health;
pub mod queue;
