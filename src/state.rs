//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::RateLimiter;
use crate::domain::click_queue::ClickIngestor;
use crate::domain::click_worker::ClickWorkerPool;
use crate::domain::repositories::{ClickStatsRepository, LinkResolver};

#[derive(Clone)]
pub struct AppState {
    pub link_resolver: Arc<dyn LinkResolver>,
    pub click_stats: Arc<dyn ClickStatsRepository>,
    pub click_ingestor: ClickIngestor,
    pub click_workers: Arc<ClickWorkerPool>,
    pub rate_limiter: Arc<RateLimiter>,
    /// Trust proxy headers when resolving client addresses.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        link_resolver: Arc<dyn LinkResolver>,
        click_stats: Arc<dyn ClickStatsRepository>,
        click_ingestor: ClickIngestor,
        click_workers: Arc<ClickWorkerPool>,
        rate_limiter: Arc<RateLimiter>,
        behind_proxy: bool,
    ) -> Self {
        Self {
            link_resolver,
            click_stats,
            click_ingestor,
            click_workers,
            rate_limiter,
            behind_proxy,
        }
    }
}
