//! Durable job queue shared by the API (producer) and the notification
//! worker (consumer).
//!
//! The broker is a Redis list: producers `LPUSH` serialized jobs, workers
//! claim with `BLMOVE` into a per-queue processing list and `LREM` on
//! completion. A claimed job is owned by exactly one worker; a job that
//! exhausts its retry budget is moved to the dead-letter list for manual
//! inspection.

mod job;
mod queue;

pub use job::{DeadLetter, JobType, NotificationJob};
pub use queue::{ClaimedJob, JobQueue, QueueError};
