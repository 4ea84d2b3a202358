//! Click record handed to the persistence port.

use chrono::{DateTime, Utc};

use crate::domain::click_event::ClickEvent;

/// The durable form of a [`ClickEvent`], enriched with the resolved link id.
///
/// Built by a worker after the link lookup succeeds and never mutated
/// afterwards; retries reuse the same record, so every attempt writes the
/// same `clicked_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickRecord {
    pub link_id: i64,
    pub short_code: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

impl ClickRecord {
    /// Builds a record from a dequeued event.
    ///
    /// `clicked_at` is the processing time, not the submission time.
    pub fn from_event(event: ClickEvent, link_id: i64, clicked_at: DateTime<Utc>) -> Self {
        Self {
            link_id,
            short_code: event.short_code,
            ip_address: event.ip_address,
            user_agent: event.user_agent,
            referer: event.referer,
            country: event.country,
            clicked_at,
        }
    }
}
