//! DTOs for click queue monitoring.

use serde::Serialize;

use crate::domain::click_worker::QueueStats;

/// Click pipeline snapshot returned by `GET /api/v1/clicks/queue`.
#[derive(Debug, Serialize)]
pub struct QueueStatsResponse {
    #[serde(flatten)]
    pub stats: QueueStats,
    pub running_workers: usize,
    pub closed: bool,
}
