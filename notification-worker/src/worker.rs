//! The consumption loop.
//!
//! Claims one job at a time from the shared queue, executes its handler
//! under the retry policy, and acks or dead-letters the claim. Multiple
//! worker processes can run against the same queue; the broker hands each
//! job to exactly one of them.

use job_queue::{JobQueue, QueueError};
use tokio::sync::watch;

use crate::error::WorkerError;
use crate::handlers;
use crate::mailer::MailClient;
use crate::metrics;
use crate::retry::{RetryConfig, RetryHandler};

/// Seconds a single claim call blocks before re-checking for shutdown.
const CLAIM_TIMEOUT_SECS: f64 = 5.0;

pub struct Worker {
    queue: JobQueue,
    mailer: MailClient,
    retry: RetryHandler,
}

impl Worker {
    pub fn new(queue: JobQueue, mailer: MailClient, retry_config: RetryConfig) -> Self {
        Self {
            queue,
            mailer,
            retry: RetryHandler::new(retry_config),
        }
    }

    /// Run until the shutdown signal fires. In-flight work is finished
    /// before returning; unclaimed jobs stay on the queue.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("Notification worker started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            let claimed = tokio::select! {
                result = self.queue.claim(CLAIM_TIMEOUT_SECS) => result,
                _ = shutdown.changed() => break,
            };

            match claimed {
                Ok(Some(claimed)) => self.process(claimed).await,
                Ok(None) => {} // Timeout, loop around
                Err(QueueError::Malformed(e)) => {
                    tracing::warn!(error = %e, "Skipped malformed job payload");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Queue claim failed; backing off");
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        }

        tracing::info!("Notification worker stopped");
    }

    async fn process(&self, claimed: job_queue::ClaimedJob) {
        let job = &claimed.job;
        tracing::info!(
            job_id = %job.id,
            job_type = job.job_type.as_str(),
            "Processing job"
        );

        let result = self
            .retry
            .execute(|| handlers::execute(&self.mailer, job), WorkerError::is_retryable)
            .await;

        match result {
            Ok(()) => {
                metrics::JOBS_PROCESSED.inc();
                if let Err(e) = self.queue.ack(&claimed).await {
                    // The job ran; a failed ack means it may be redelivered,
                    // which at-least-once semantics already allow.
                    tracing::error!(job_id = %job.id, error = %e, "Failed to ack completed job");
                }
            }
            Err(exhausted) => {
                metrics::JOB_ATTEMPTS_FAILED.inc_by(exhausted.attempts as u64);
                metrics::JOBS_DEAD_LETTERED.inc();
                tracing::error!(
                    job_id = %job.id,
                    attempts = exhausted.attempts,
                    error = %exhausted.error,
                    "Job failed; moving to dead-letter list"
                );

                if let Err(e) = self
                    .queue
                    .dead_letter(
                        &claimed,
                        &exhausted.error.to_string(),
                        exhausted.attempts as u32,
                    )
                    .await
                {
                    tracing::error!(job_id = %job.id, error = %e, "Failed to dead-letter job");
                }
            }
        }
    }
}
