//! Channel-backed queue with a depth gauge.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::job::BatchJob;

/// Backlog size at which enqueues start logging warnings.
const DEPTH_WARNING_THRESHOLD: usize = 100;

/// Errors that can occur enqueueing a job.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue is closed")]
    Closed,
}

/// Submission side of the queue. Cheap to clone into shared state.
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::UnboundedSender<BatchJob>,
    depth: Arc<AtomicUsize>,
}

/// Consumer side of the queue. Exactly one exists per queue.
pub struct JobReceiver {
    rx: mpsc::UnboundedReceiver<BatchJob>,
    depth: Arc<AtomicUsize>,
}

impl JobQueue {
    /// Create a queue, returning the submission handle and the single
    /// consumer handle.
    pub fn new() -> (JobQueue, JobReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let depth = Arc::new(AtomicUsize::new(0));
        (
            JobQueue {
                tx,
                depth: Arc::clone(&depth),
            },
            JobReceiver { rx, depth },
        )
    }

    /// Record a job for later execution. Returns as soon as the job is
    /// queued; processing happens on the consumer.
    pub fn enqueue(&self, job: BatchJob) -> Result<(), QueueError> {
        let job_id = job.job_id.clone();
        self.tx.send(job).map_err(|_| QueueError::Closed)?;
        let depth = self.depth.fetch_add(1, Ordering::SeqCst) + 1;

        if depth >= DEPTH_WARNING_THRESHOLD {
            warn!(%job_id, depth, "queue backlog is high");
        } else {
            info!(%job_id, depth, "enqueued job");
        }
        Ok(())
    }

    /// Number of jobs queued but not yet picked up.
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }
}

impl JobReceiver {
    /// Wait for the next job. Returns `None` once every submission handle
    /// is dropped and the backlog is drained.
    pub async fn recv(&mut self) -> Option<BatchJob> {
        let job = self.rx.recv().await?;
        self.depth.fetch_sub(1, Ordering::SeqCst);
        Some(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixpress_models::JobId;

    #[tokio::test]
    async fn test_enqueue_then_recv_in_order() {
        let (queue, mut rx) = JobQueue::new();
        let first = JobId::new();
        let second = JobId::new();

        queue.enqueue(BatchJob::new(first.clone(), vec![1])).unwrap();
        queue.enqueue(BatchJob::new(second.clone(), vec![2])).unwrap();
        assert_eq!(queue.depth(), 2);

        assert_eq!(rx.recv().await.unwrap().job_id, first);
        assert_eq!(rx.recv().await.unwrap().job_id, second);
        assert_eq!(queue.depth(), 0);
    }

    #[tokio::test]
    async fn test_recv_drains_after_close() {
        let (queue, mut rx) = JobQueue::new();
        queue.enqueue(BatchJob::new(JobId::new(), vec![])).unwrap();
        drop(queue);

        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_enqueue_after_consumer_dropped() {
        let (queue, rx) = JobQueue::new();
        drop(rx);
        let err = queue.enqueue(BatchJob::new(JobId::new(), vec![])).unwrap_err();
        assert!(matches!(err, QueueError::Closed));
    }
}
