//! In-process job queue.
//!
//! Submission enqueues and returns immediately; a single consumer drains
//! jobs in arrival order. The queue lives for the process lifetime and is
//! wired up explicitly at startup, never as a module-level singleton.

pub mod job;
pub mod queue;

pub use job::BatchJob;
pub use queue::{JobQueue, JobReceiver, QueueError};
