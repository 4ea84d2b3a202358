//! Worker pool draining the click queue into the click repository.
//!
//! A fixed number of tokio tasks share one [`ClickQueue`]. Each worker pulls
//! the next event, resolves its link id, stamps it and persists it with a
//! bounded, linearly backed-off retry. Failures are logged and the event is
//! discarded; nothing in this path is fatal to the worker or the process.
//!
//! There is no ordering across workers. A single worker handles its events in
//! the order it received them.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_retry::RetryIf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::click_queue::ClickQueue;
use crate::domain::entities::ClickRecord;
use crate::domain::repositories::{ClickRepository, RepositoryError};

/// Default number of concurrent workers.
pub const DEFAULT_WORKER_COUNT: usize = 3;
/// Default number of persistence attempts per event.
pub const DEFAULT_MAX_RETRIES: usize = 3;
/// Default backoff unit; attempt `i` (0-indexed) waits `(i + 1)` units before the next one.
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(100);

/// Tuning knobs for [`ClickWorkerPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    pub worker_count: usize,
    pub max_retries: usize,
    pub backoff_step: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_step: DEFAULT_BACKOFF_STEP,
        }
    }
}

/// Snapshot of the click queue for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub queue_capacity: usize,
    pub queue_occupancy: usize,
    pub worker_count: usize,
}

/// What happened to a single event once a worker picked it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Persisted after `attempts` calls to the repository.
    Persisted { attempts: usize },
    /// The short code could not be resolved; nothing was written.
    Unresolved,
    /// Every persistence attempt failed.
    Exhausted { attempts: usize },
    /// Shutdown was signalled before a failed write could be retried.
    Abandoned { attempts: usize },
}

struct Running {
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

/// Fixed-size pool of click workers.
///
/// Lifecycle is `Stopped -> Running -> Stopped`: [`start`](Self::start)
/// spawns the workers, [`stop`](Self::stop) cancels them and waits until all
/// of them have returned. Calling `start` twice without a `stop` in between
/// is not supported.
pub struct ClickWorkerPool {
    queue: ClickQueue,
    repository: Arc<dyn ClickRepository>,
    settings: WorkerSettings,
    live_workers: Arc<AtomicUsize>,
    running: Mutex<Option<Running>>,
}

impl ClickWorkerPool {
    /// Creates a stopped pool over the consumer side of a click queue.
    pub fn new(
        queue: ClickQueue,
        repository: Arc<dyn ClickRepository>,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            queue,
            repository,
            settings,
            live_workers: Arc::new(AtomicUsize::new(0)),
            running: Mutex::new(None),
        }
    }

    /// Spawns all workers and returns immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let cancel = CancellationToken::new();

        info!(
            worker_count = self.settings.worker_count,
            max_retries = self.settings.max_retries,
            "starting click workers"
        );

        let handles = (0..self.settings.worker_count)
            .map(|worker_id| {
                let worker = ClickWorker {
                    id: worker_id,
                    queue: self.queue.clone(),
                    repository: Arc::clone(&self.repository),
                    settings: self.settings,
                    cancel: cancel.clone(),
                };
                let live = LiveGuard::enter(Arc::clone(&self.live_workers));
                tokio::spawn(async move {
                    let _live = live;
                    worker.run().await;
                })
            })
            .collect();

        *self.running.lock() = Some(Running { cancel, handles });
    }

    /// Signals cancellation and waits for every worker to return.
    ///
    /// A worker in the middle of a write lets that attempt complete before it
    /// exits; no retry is started after cancellation, so a failed attempt
    /// abandons its event. Events still waiting in the queue
    /// are not drained; they are discarded with the queue, which is closed so
    /// later submissions fail with
    /// [`SubmitError::Closed`](crate::domain::click_queue::SubmitError::Closed).
    ///
    /// Calling `stop` on a pool that is not running only closes the queue.
    pub async fn stop(&self) {
        let running = self.running.lock().take();

        info!("stopping click workers");

        let Some(Running { cancel, handles }) = running else {
            self.queue.close();
            return;
        };

        cancel.cancel();
        self.queue.close();

        for (worker_id, handle) in handles.into_iter().enumerate() {
            if let Err(join_error) = handle.await {
                error!(worker_id, error = %join_error, "click worker panicked");
            }
        }

        let discarded = self.queue.len();
        if discarded > 0 {
            debug!(discarded, "queued click events discarded at shutdown");
        }

        info!("click workers stopped");
    }

    /// Current queue capacity, occupancy and configured worker count.
    pub fn queue_stats(&self) -> QueueStats {
        QueueStats {
            queue_capacity: self.queue.capacity().unwrap_or(usize::MAX),
            queue_occupancy: self.queue.len(),
            worker_count: self.settings.worker_count,
        }
    }

    /// Number of worker tasks that have been spawned and not yet returned.
    pub fn running_workers(&self) -> usize {
        self.live_workers.load(Ordering::Acquire)
    }
}

/// Keeps the live worker count accurate even if a worker panics.
struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn enter(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

struct ClickWorker {
    id: usize,
    queue: ClickQueue,
    repository: Arc<dyn ClickRepository>,
    settings: WorkerSettings,
    cancel: CancellationToken,
}

impl ClickWorker {
    async fn run(self) {
        debug!(worker_id = self.id, "click worker started");

        loop {
            // Cancellation wins over a ready event.
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                received = self.queue.recv() => match received {
                    Ok(event) => event,
                    Err(_) => break,
                },
            };

            process_click(self.repository.as_ref(), &self.settings, &self.cancel, event).await;
        }

        debug!(worker_id = self.id, "click worker stopped");
    }
}

/// Resolves, stamps and persists a single click event.
///
/// Persistence is attempted up to `settings.max_retries` times. Before attempt
/// `n + 1` the worker sleeps `n * backoff_step`; the first attempt runs
/// immediately. The sleep only suspends the calling worker.
///
/// The first attempt always runs. Once `cancel` fires no further attempt is
/// started: an attempt already in progress completes, and if it fails the
/// event is abandoned.
pub async fn process_click(
    repository: &dyn ClickRepository,
    settings: &WorkerSettings,
    cancel: &CancellationToken,
    event: ClickEvent,
) -> ClickOutcome {
    let link_id = match repository.resolve_link_id(&event.short_code).await {
        Ok(link_id) => link_id,
        Err(e) => {
            warn!(
                short_code = %event.short_code,
                error = %e,
                "failed to resolve link id for click, event discarded"
            );
            metrics::counter!("clicks_discarded_total", "reason" => "unresolved").increment(1);
            return ClickOutcome::Unresolved;
        }
    };

    let record = ClickRecord::from_event(event, link_id, Utc::now());
    let max_retries = settings.max_retries.max(1);
    let mut attempts = 0usize;
    let record = &record;

    let result = RetryIf::spawn(
        linear_backoff(settings.backoff_step, max_retries),
        || {
            // Cancelled while sleeping between attempts.
            let cancelled = attempts > 0 && cancel.is_cancelled();
            if !cancelled {
                attempts += 1;
            }
            let attempt = attempts;

            async move {
                if cancelled {
                    return Err(AttemptError::Cancelled);
                }

                repository.record_click(record).await.map_err(|e| {
                    if attempt < max_retries && !cancel.is_cancelled() {
                        debug!(
                            short_code = %record.short_code,
                            attempt,
                            error = %e,
                            "click write failed, retrying"
                        );
                        metrics::counter!("click_persist_retries_total").increment(1);
                    }
                    AttemptError::Write(e)
                })
            }
        },
        |e: &AttemptError| matches!(e, AttemptError::Write(_)) && !cancel.is_cancelled(),
    )
    .await;

    match result {
        Ok(()) => {
            metrics::counter!("clicks_persisted_total").increment(1);
            ClickOutcome::Persisted { attempts }
        }
        Err(AttemptError::Write(e)) if attempts >= max_retries => {
            error!(
                short_code = %record.short_code,
                attempts,
                error = %e,
                "failed to record click after all attempts"
            );
            metrics::counter!("clicks_discarded_total", "reason" => "persist_failed").increment(1);
            ClickOutcome::Exhausted { attempts }
        }
        Err(e) => {
            warn!(
                short_code = %record.short_code,
                attempts,
                error = %e,
                "click write abandoned at shutdown"
            );
            metrics::counter!("clicks_discarded_total", "reason" => "shutdown").increment(1);
            ClickOutcome::Abandoned { attempts }
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum AttemptError {
    #[error(transparent)]
    Write(RepositoryError),

    #[error("worker cancelled")]
    Cancelled,
}

/// Delays between persistence attempts: `step`, `2 * step`, ... for
/// `max_retries - 1` gaps.
fn linear_backoff(step: Duration, max_retries: usize) -> impl Iterator<Item = Duration> {
    let max_retries = u32::try_from(max_retries).unwrap_or(u32::MAX);
    (1..max_retries).map(move |n| step.saturating_mul(n))
}
