//! Request handlers.

pub mod health;
pub mod jobs;

pub use health::health;
pub use jobs::{job_status, upload_csv};
