//! Click event model for asynchronous click tracking.

/// An in-memory representation of a redirect for async processing.
///
/// Passed from the redirect handler to the worker pool through the bounded
/// click queue. The event carries no timestamp: workers stamp the persisted
/// [`crate::domain::entities::ClickRecord`] when they process it.
///
/// # Usage Flow
///
/// 1. Created in the redirect handler with request metadata
/// 2. Submitted through [`crate::domain::click_queue::ClickIngestor::submit`] (non-blocking)
/// 3. Picked up by a worker of [`crate::domain::click_worker::ClickWorkerPool`]
/// 4. Enriched with the link id and persisted as a `ClickRecord`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub short_code: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
}

impl ClickEvent {
    /// Creates a new click event.
    ///
    /// # Arguments
    ///
    /// - `short_code` - The short code that was accessed
    /// - `ip_address` - Optional client address
    /// - `user_agent` - Optional User-Agent header
    /// - `referer` - Optional Referer header
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(
    ///     "abc123".to_string(),
    ///     Some("192.168.1.1".to_string()),
    ///     Some("Mozilla/5.0"),
    ///     Some("https://google.com"),
    /// );
    /// ```
    pub fn new(
        short_code: String,
        ip_address: Option<String>,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Self {
        Self {
            short_code,
            ip_address,
            user_agent: user_agent.map(|s| s.to_string()),
            referer: referer.map(|s| s.to_string()),
            country: None,
        }
    }

    /// Attaches an ISO country code resolved upstream (e.g. by a CDN header).
    pub fn with_country(mut self, country: Option<&str>) -> Self {
        self.country = country.filter(|c| !c.is_empty()).map(str::to_uppercase);
        self
    }
}
