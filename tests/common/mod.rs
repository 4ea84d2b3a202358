#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use linkpulse::application::services::{RateLimiter, RateLimiterConfig};
use linkpulse::domain::click_queue::{ClickQueue, click_queue};
use linkpulse::domain::click_worker::{ClickWorkerPool, WorkerSettings};
use linkpulse::domain::entities::ClickRecord;
use linkpulse::domain::repositories::{
    ClickRepository, ClickStats, ClickStatsRepository, DailyClickStats, LinkResolver,
    RepositoryError,
};
use linkpulse::state::AppState;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Notify, Semaphore};
use tower::Layer;

pub const TEST_LINKS: &[(&str, i64, &str)] = &[
    ("abc123", 1, "https://example.com/target"),
    ("docs", 2, "https://docs.example.com"),
];

/// In-memory click store.
///
/// Can be told to fail a number of writes, or to hold every write until the
/// test releases it.
pub struct RecordingClickRepository {
    links: HashMap<String, i64>,
    records: Mutex<Vec<ClickRecord>>,
    attempts: AtomicUsize,
    failures_left: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
    entered: Arc<Notify>,
}

impl RecordingClickRepository {
    pub fn new() -> Self {
        Self {
            links: TEST_LINKS
                .iter()
                .map(|(code, id, _)| (code.to_string(), *id))
                .collect(),
            records: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            failures_left: AtomicUsize::new(0),
            gate: None,
            entered: Arc::new(Notify::new()),
        }
    }

    /// Fails the next `count` writes with a database error.
    pub fn failing(self, count: usize) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    /// Blocks writes until permits are added to the returned semaphore.
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// Notified each time a write starts.
    pub fn entered(&self) -> Arc<Notify> {
        self.entered.clone()
    }

    pub fn records(&self) -> Vec<ClickRecord> {
        self.records.lock().clone()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().len()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClickRepository for RecordingClickRepository {
    async fn resolve_link_id(&self, short_code: &str) -> Result<i64, RepositoryError> {
        self.links
            .get(short_code)
            .copied()
            .ok_or_else(|| RepositoryError::LinkNotFound(short_code.to_string()))
    }

    async fn record_click(&self, record: &ClickRecord) -> Result<(), RepositoryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }

        self.records.lock().push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl ClickStatsRepository for RecordingClickRepository {
    async fn click_stats(&self, short_code: &str) -> Result<ClickStats, RepositoryError> {
        self.resolve_link_id(short_code).await?;

        let records = self.records.lock();
        let clicks: Vec<_> = records.iter().filter(|r| r.short_code == short_code).collect();
        let unique: HashSet<_> = clicks.iter().filter_map(|r| r.ip_address.as_deref()).collect();

        Ok(ClickStats {
            short_code: short_code.to_string(),
            total_clicks: clicks.len() as i64,
            unique_clicks: unique.len() as i64,
        })
    }

    async fn daily_click_stats(
        &self,
        short_code: &str,
        days: u32,
    ) -> Result<Vec<DailyClickStats>, RepositoryError> {
        self.resolve_link_id(short_code).await?;

        let since = chrono::Utc::now() - chrono::Duration::days(i64::from(days));
        let mut per_day = BTreeMap::new();
        for record in self.records.lock().iter() {
            if record.short_code == short_code && record.clicked_at >= since {
                *per_day.entry(record.clicked_at.date_naive()).or_insert(0i64) += 1;
            }
        }

        Ok(per_day
            .into_iter()
            .rev()
            .map(|(date, clicks)| DailyClickStats { date, clicks })
            .collect())
    }
}

/// Resolves the codes in [`TEST_LINKS`].
pub struct StaticLinkResolver {
    targets: HashMap<String, String>,
}

impl StaticLinkResolver {
    pub fn new() -> Self {
        Self {
            targets: TEST_LINKS
                .iter()
                .map(|(code, _, url)| (code.to_string(), url.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl LinkResolver for StaticLinkResolver {
    async fn find_target_url(&self, code: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.targets.get(code).cloned())
    }
}

/// A click on `short_code` recorded `days_ago` days before now.
pub fn click_record(short_code: &str, ip: &str, days_ago: i64) -> ClickRecord {
    let link_id = TEST_LINKS
        .iter()
        .find(|(code, _, _)| *code == short_code)
        .map(|(_, id, _)| *id)
        .unwrap_or_default();

    ClickRecord {
        link_id,
        short_code: short_code.to_string(),
        ip_address: Some(ip.to_string()),
        user_agent: None,
        referer: None,
        country: None,
        clicked_at: chrono::Utc::now() - chrono::Duration::days(days_ago),
    }
}

pub fn fast_worker_settings() -> WorkerSettings {
    WorkerSettings {
        worker_count: 2,
        max_retries: 3,
        backoff_step: Duration::from_millis(10),
    }
}

pub fn limiter_config(requests_per_second: f64, burst_size: u32) -> RateLimiterConfig {
    RateLimiterConfig {
        requests_per_second,
        burst_size,
        cleanup_interval: Duration::from_secs(60),
    }
}

/// Builds state around a stopped worker pool.
///
/// The returned queue lets tests inspect submitted events directly; start
/// `state.click_workers` to have them persisted into `repository`.
pub fn create_test_state(
    repository: Arc<RecordingClickRepository>,
    limiter: RateLimiterConfig,
    behind_proxy: bool,
) -> (AppState, ClickQueue) {
    let (ingestor, queue) = click_queue(16);
    let workers = Arc::new(ClickWorkerPool::new(
        queue.clone(),
        repository.clone(),
        fast_worker_settings(),
    ));
    let rate_limiter = Arc::new(RateLimiter::new(limiter).unwrap());

    let state = AppState::new(
        Arc::new(StaticLinkResolver::new()),
        repository.clone(),
        ingestor,
        workers,
        rate_limiter,
        behind_proxy,
    );

    (state, queue)
}

pub fn default_test_state() -> (AppState, ClickQueue) {
    create_test_state(
        Arc::new(RecordingClickRepository::new()),
        RateLimiterConfig::default(),
        false,
    )
}

/// Inserts a fixed peer address, standing in for
/// `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer(pub SocketAddr);

impl Default for MockConnectInfoLayer {
    fn default() -> Self {
        Self("127.0.0.1:12345".parse().unwrap())
    }
}

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService {
            inner,
            addr: self.0,
        }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
    addr: SocketAddr,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(ConnectInfo(self.addr));
        self.inner.call(req)
    }
}

/// A log event recorded by [`LogCapture`].
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: tracing::Level,
    pub message: String,
    pub short_code: Option<String>,
}

/// Tracing layer that records every event for assertions.
#[derive(Clone, Default)]
pub struct LogCapture {
    captured: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the layer as the thread's default subscriber.
    ///
    /// Works with `#[tokio::test]`'s current-thread runtime, where spawned
    /// tasks run on the test thread.
    pub fn set_default(&self) -> tracing::subscriber::DefaultGuard {
        use tracing_subscriber::layer::SubscriberExt;

        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    pub fn events_at(&self, level: tracing::Level) -> Vec<CapturedEvent> {
        self.captured
            .lock()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        self.captured.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
            short_code: visitor.short_code,
        });
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    short_code: Option<String>,
}

impl tracing::field::Visit for EventVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "short_code" => self.short_code = Some(format!("{value:?}")),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "short_code" => self.short_code = Some(value.to_string()),
            _ => {}
        }
    }
}
