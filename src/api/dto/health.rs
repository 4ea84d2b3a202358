//! DTOs for health check endpoint.

use serde::Serialize;

use crate::domain::click_worker::QueueStats;

/// Health check response with component status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

/// Health status for each system component.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub click_queue: QueueCheck,
    pub rate_limiter: CheckStatus,
}

/// Click queue status with its current statistics.
#[derive(Debug, Serialize)]
pub struct QueueCheck {
    #[serde(flatten)]
    pub status: CheckStatus,
    pub stats: QueueStats,
}

/// Individual component health status.
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
