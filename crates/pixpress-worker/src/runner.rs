//! Queue consumer: one job at a time.

use tokio::sync::watch;
use tracing::{error, info};

use pixpress_queue::JobReceiver;

use crate::pipeline::BatchPipeline;

/// Signals the consumer to stop after the job in flight.
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    pub fn signal(&self) {
        let _ = self.tx.send(true);
    }
}

/// The single background consumer.
///
/// Jobs run strictly sequentially; concurrency lives inside the pipeline's
/// row fan-out. If the process dies mid-job, that job's record stays in
/// `processing`; there is no resumption.
pub struct QueueConsumer {
    receiver: JobReceiver,
    pipeline: BatchPipeline,
    shutdown_rx: watch::Receiver<bool>,
}

impl QueueConsumer {
    pub fn new(receiver: JobReceiver, pipeline: BatchPipeline) -> (Self, ShutdownHandle) {
        let (tx, shutdown_rx) = watch::channel(false);
        (
            Self {
                receiver,
                pipeline,
                shutdown_rx,
            },
            ShutdownHandle { tx },
        )
    }

    /// Pull and execute jobs until shutdown is signalled or every
    /// submission handle is gone.
    pub async fn run(mut self) {
        info!("queue consumer started");
        loop {
            tokio::select! {
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        info!("shutdown signalled, stopping consumer");
                        break;
                    }
                }
                job = self.receiver.recv() => {
                    let Some(job) = job else {
                        info!("queue closed, stopping consumer");
                        break;
                    };
                    let job_id = job.job_id.clone();
                    // Failures are already recorded on the job record;
                    // the submitter observes them by polling.
                    if let Err(e) = self.pipeline.run(job).await {
                        error!(%job_id, error = %e, "job finished with pipeline error");
                    }
                }
            }
        }
        info!("queue consumer stopped");
    }
}
