//! Per-key token bucket admission control with idle-bucket eviction.
//!
//! Every admission key (usually the client address) owns one GCRA limiter
//! from `governor`, created lazily on the key's first request. A background
//! sweep removes buckets that have been idle for more than three cleanup
//! intervals, which keeps the map bounded under high-cardinality traffic.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter as GovernorLimiter};
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Buckets idle for longer than this many cleanup intervals are evicted.
const IDLE_INTERVALS: u32 = 3;

/// Limiter settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimiterConfig {
    /// Sustained refill rate in tokens per second.
    pub requests_per_second: f64,
    /// Bucket capacity.
    pub burst_size: u32,
    /// Period of the eviction sweep.
    pub cleanup_interval: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10.0,
            burst_size: 20,
            cleanup_interval: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateLimiterError {
    #[error("requests per second must be a positive finite number, got {0}")]
    InvalidRate(f64),

    #[error("burst size must be at least 1")]
    ZeroBurst,

    #[error("cleanup interval must be greater than zero")]
    ZeroCleanupInterval,
}

struct Bucket {
    limiter: DefaultDirectRateLimiter,
    last_seen: Mutex<Instant>,
}

impl Bucket {
    fn new(quota: Quota, now: Instant) -> Self {
        Self {
            limiter: GovernorLimiter::direct(quota),
            last_seen: Mutex::new(now),
        }
    }

    fn touch(&self, now: Instant) {
        let mut last_seen = self.last_seen.lock();
        if now > *last_seen {
            *last_seen = now;
        }
    }

    fn last_seen(&self) -> Instant {
        *self.last_seen.lock()
    }

    /// Takes one token if one is available. A rejected check consumes nothing.
    fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

/// Keyed token bucket limiter.
///
/// Safe to share between request handlers behind an `Arc`. Lookups of known
/// keys take the shared lock; only the first request for a key takes the
/// exclusive lock to insert its bucket. The token check itself is an atomic
/// compare-and-swap inside `governor`, so concurrent admissions on one key
/// never lose updates.
pub struct RateLimiter {
    config: RateLimiterConfig,
    quota: Quota,
    buckets: RwLock<HashMap<String, Bucket>>,
}

impl RateLimiter {
    /// Creates an empty limiter.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimiterError`] if the rate is not positive and finite,
    /// the burst is zero, or the cleanup interval is zero.
    pub fn new(config: RateLimiterConfig) -> Result<Self, RateLimiterError> {
        let rate = config.requests_per_second;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(RateLimiterError::InvalidRate(rate));
        }

        let burst = NonZeroU32::new(config.burst_size).ok_or(RateLimiterError::ZeroBurst)?;

        if config.cleanup_interval.is_zero() {
            return Err(RateLimiterError::ZeroCleanupInterval);
        }

        // Rates too small or too large for a `Duration` period are rejected.
        let quota = Duration::try_from_secs_f64(1.0 / rate)
            .ok()
            .and_then(Quota::with_period)
            .ok_or(RateLimiterError::InvalidRate(rate))?
            .allow_burst(burst);

        Ok(Self {
            config,
            quota,
            buckets: RwLock::new(HashMap::new()),
        })
    }

    /// Decides whether a request for `key` is admitted.
    ///
    /// Creates the bucket on the key's first request and refreshes its
    /// last-seen time on every call, admitted or not.
    pub fn admit(&self, key: &str) -> bool {
        let now = Instant::now();

        {
            let buckets = self.buckets.read();
            if let Some(bucket) = buckets.get(key) {
                bucket.touch(now);
                return self.decide(key, bucket);
            }
        }

        let mut buckets = self.buckets.write();
        let bucket = buckets
            .entry(key.to_owned())
            .or_insert_with(|| Bucket::new(self.quota, now));
        bucket.touch(now);
        let admitted = self.decide(key, bucket);
        metrics::gauge!("rate_limiter_tracked_keys").set(buckets.len() as f64);
        admitted
    }

    /// Admits under an alternate key (for example an API key), falling back to
    /// `client_addr` when the extractor yields nothing or an empty string.
    pub fn admit_with<F>(&self, extract_key: F, client_addr: &str) -> bool
    where
        F: FnOnce() -> Option<String>,
    {
        match extract_key().filter(|key| !key.is_empty()) {
            Some(key) => self.admit(&key),
            None => self.admit(client_addr),
        }
    }

    fn decide(&self, key: &str, bucket: &Bucket) -> bool {
        let admitted = bucket.try_acquire();
        if !admitted {
            debug!(key, "rate limit exceeded");
            metrics::counter!("rate_limit_rejected_total").increment(1);
        }
        admitted
    }

    /// Retry hint sent with rejections.
    ///
    /// This is the cleanup interval, not the time until the next token.
    pub fn retry_after(&self) -> Duration {
        self.config.cleanup_interval
    }

    /// Limiter settings.
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Number of keys that currently own a bucket.
    pub fn tracked_keys(&self) -> usize {
        self.buckets.read().len()
    }

    /// Removes every bucket idle for longer than three cleanup intervals.
    ///
    /// Returns the number of evicted buckets.
    pub fn cleanup(&self) -> usize {
        self.evict_idle(Instant::now())
    }

    fn evict_idle(&self, now: Instant) -> usize {
        let max_idle = self.config.cleanup_interval * IDLE_INTERVALS;

        let mut buckets = self.buckets.write();
        let before = buckets.len();
        buckets.retain(|_, bucket| now.saturating_duration_since(bucket.last_seen()) <= max_idle);
        let evicted = before - buckets.len();

        metrics::gauge!("rate_limiter_tracked_keys").set(buckets.len() as f64);
        if evicted > 0 {
            debug!(evicted, remaining = buckets.len(), "evicted idle rate limit buckets");
        }
        evicted
    }

    /// Starts the periodic eviction sweep on the current tokio runtime.
    ///
    /// The first pass runs one cleanup interval after the call.
    pub fn spawn_cleanup(self: &Arc<Self>) -> CleanupTask {
        let cancel = CancellationToken::new();
        let limiter = Arc::clone(self);
        let token = cancel.clone();
        let period = self.config.cleanup_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        limiter.cleanup();
                    }
                }
            }
        });

        info!(
            interval_secs = period.as_secs(),
            "rate limiter cleanup started"
        );

        CleanupTask { cancel, handle }
    }
}

/// Handle to the background eviction sweep.
pub struct CleanupTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl CleanupTask {
    /// Stops the sweep and waits for it to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "rate limiter cleanup task panicked");
        }
        info!("rate limiter cleanup stopped");
    }
}
