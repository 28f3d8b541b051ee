//! In-process revalidation queue.
//!
//! A bounded Tokio channel implements the `RevalidationScheduler` port. The
//! sending half is cloned into request handlers; the receiving half is drained
//! by a single background task that hands each job to the
//! [`RevalidationWorker`], one at a time, inside the trace scope of the
//! request that queued it.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::ports::{JobDispatchError, RevalidationScheduler};
use crate::domain::{RevalidationTarget, RevalidationWorker, TraceId};

#[derive(Debug)]
struct RevalidationJob {
    target: RevalidationTarget,
    trace_id: Option<TraceId>,
}

/// Sending half of the queue.
#[derive(Debug, Clone)]
pub struct TokioRevalidationQueue {
    sender: mpsc::Sender<RevalidationJob>,
}

/// Receiving half of the queue, consumed by [`RevalidationJobReceiver::run`].
#[derive(Debug)]
pub struct RevalidationJobReceiver {
    receiver: mpsc::Receiver<RevalidationJob>,
}

impl TokioRevalidationQueue {
    /// Create a queue holding at most `capacity` pending jobs.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, RevalidationJobReceiver) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, RevalidationJobReceiver { receiver })
    }
}

#[async_trait]
impl RevalidationScheduler for TokioRevalidationQueue {
    async fn schedule(&self, target: RevalidationTarget) -> Result<(), JobDispatchError> {
        let job = RevalidationJob {
            target,
            trace_id: TraceId::current(),
        };
        match self.sender.try_send(job) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(job)) => Err(JobDispatchError::rejected(format!(
                "queue full, dropped {}",
                job.target
            ))),
            Err(mpsc::error::TrySendError::Closed(job)) => Err(JobDispatchError::unavailable(
                format!("queue closed, dropped {}", job.target),
            )),
        }
    }
}

impl RevalidationJobReceiver {
    /// Drain jobs until every sender is dropped.
    pub async fn run(mut self, worker: RevalidationWorker) {
        info!("revalidation worker started");
        while let Some(job) = self.receiver.recv().await {
            let trace_id = job.trace_id.unwrap_or_else(TraceId::generate);
            TraceId::scope(trace_id, async {
                debug!(path = %job.target, "processing revalidation job");
                if let Err(error) = worker.process_job(&job.target).await {
                    warn!(path = %job.target, %error, "revalidation job failed");
                }
            })
            .await;
        }
        info!("revalidation worker stopped");
    }
}
