//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod click_stats;
pub mod health;
pub mod queue_stats;
pub mod redirect;

pub use click_stats::{click_stats_handler, daily_click_stats_handler};
pub use health::health_handler;
pub use queue_stats::queue_stats_handler;
pub use redirect::redirect_handler;
