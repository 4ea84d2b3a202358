//! Bounded click queue shared by request handlers and click workers.
//!
//! The producer side ([`ClickIngestor`]) never waits: an event either fits in
//! the queue or is dropped on the spot. Click analytics are best-effort,
//! redirects are not.

use async_channel::TrySendError;
use tracing::{trace, warn};

use crate::domain::click_event::ClickEvent;

/// Consumer side of the click queue, drained by
/// [`crate::domain::click_worker::ClickWorkerPool`].
pub type ClickQueue = async_channel::Receiver<ClickEvent>;

/// Creates the click queue with a fixed capacity.
///
/// The capacity cannot be changed after construction. Every clone of the
/// returned [`ClickIngestor`] feeds the same queue, and every clone of the
/// [`ClickQueue`] competes for the same events.
pub fn click_queue(capacity: usize) -> (ClickIngestor, ClickQueue) {
    let (sender, receiver) = async_channel::bounded(capacity);
    (ClickIngestor { sender }, receiver)
}

/// Result of a successful [`ClickIngestor::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The event took a free slot and will be processed by a worker.
    Queued,
    /// The queue was at capacity and the event was discarded.
    Dropped,
}

/// Returned when the pipeline has already been shut down.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("click pipeline is closed")]
    Closed,
}

/// Producer handle for click events.
///
/// Cheap to clone; stored in [`crate::state::AppState`] and shared by every
/// redirect handler.
#[derive(Debug, Clone)]
pub struct ClickIngestor {
    sender: async_channel::Sender<ClickEvent>,
}

impl ClickIngestor {
    /// Enqueues a click event without waiting.
    ///
    /// A full queue is not an error: the event is dropped, a warning naming the
    /// short code is logged, and `Ok(Submission::Dropped)` is returned so the
    /// caller's redirect is never slowed down or failed.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Closed`] once the worker pool has been stopped.
    /// Callers should treat it as non-fatal.
    pub fn submit(&self, event: ClickEvent) -> Result<Submission, SubmitError> {
        match self.sender.try_send(event) {
            Ok(()) => {
                trace!("click event queued");
                metrics::counter!("clicks_submitted_total").increment(1);
                Ok(Submission::Queued)
            }
            Err(TrySendError::Full(event)) => {
                warn!(
                    short_code = %event.short_code,
                    capacity = self.capacity(),
                    "click queue is full, event dropped"
                );
                metrics::counter!("clicks_dropped_total", "reason" => "queue_full").increment(1);
                Ok(Submission::Dropped)
            }
            Err(TrySendError::Closed(_)) => Err(SubmitError::Closed),
        }
    }

    /// Fixed capacity of the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity().unwrap_or(usize::MAX)
    }

    /// Number of events currently waiting for a worker.
    pub fn len(&self) -> usize {
        self.sender.len()
    }

    /// Returns `true` when no event is waiting.
    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }

    /// Returns `true` once the queue has been closed by pool shutdown.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
