use redis::aio::ConnectionManager;
use thiserror::Error;
use uuid::Uuid;

use crate::job::{DeadLetter, NotificationJob};

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Malformed job payload: {0}")]
    Malformed(String),
}

/// A job claimed from the queue. The raw payload is kept so the exact
/// processing-list entry can be removed on ack or dead-letter.
#[derive(Debug, Clone)]
pub struct ClaimedJob {
    pub job: NotificationJob,
    raw: String,
}

/// Producer/consumer handle over the Redis-backed queue.
///
/// Both halves are safe for concurrent use: `LPUSH` appends atomically and
/// `BLMOVE` hands each entry to exactly one claimant.
#[derive(Clone)]
pub struct JobQueue {
    redis: ConnectionManager,
    queue_key: String,
}

impl JobQueue {
    pub fn new(redis: ConnectionManager, queue_key: impl Into<String>) -> Self {
        Self {
            redis,
            queue_key: queue_key.into(),
        }
    }

    fn processing_key(&self) -> String {
        format!("{}:processing", self.queue_key)
    }

    fn dead_letter_key(&self) -> String {
        format!("{}:dead", self.queue_key)
    }

    /// Append a job and return its id immediately.
    ///
    /// The caller never waits on execution; the worker picks the job up on
    /// its own schedule.
    pub async fn enqueue(&self, job: &NotificationJob) -> Result<Uuid, QueueError> {
        let payload =
            serde_json::to_string(job).map_err(|e| QueueError::Malformed(e.to_string()))?;

        let mut redis = self.redis.clone();
        redis::cmd("LPUSH")
            .arg(&self.queue_key)
            .arg(&payload)
            .query_async::<_, ()>(&mut redis)
            .await?;

        tracing::debug!(
            job_id = %job.id,
            job_type = job.job_type.as_str(),
            queue = %self.queue_key,
            "Job enqueued"
        );
        Ok(job.id)
    }

    /// Block up to `timeout_secs` for the next job, moving it atomically
    /// onto the processing list. Returns `None` on timeout.
    ///
    /// A payload that fails to deserialize is dead-lettered on the spot so
    /// it cannot wedge the queue head.
    pub async fn claim(&self, timeout_secs: f64) -> Result<Option<ClaimedJob>, QueueError> {
        let mut redis = self.redis.clone();
        let raw: Option<String> = redis::cmd("BLMOVE")
            .arg(&self.queue_key)
            .arg(self.processing_key())
            .arg("RIGHT")
            .arg("LEFT")
            .arg(timeout_secs)
            .query_async(&mut redis)
            .await?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        match serde_json::from_str::<NotificationJob>(&raw) {
            Ok(job) => Ok(Some(ClaimedJob { job, raw })),
            Err(e) => {
                tracing::warn!(error = %e, "Dead-lettering malformed job payload");
                self.remove_processing_entry(&raw).await?;
                let mut redis = self.redis.clone();
                redis::cmd("LPUSH")
                    .arg(self.dead_letter_key())
                    .arg(&raw)
                    .query_async::<_, ()>(&mut redis)
                    .await?;
                Err(QueueError::Malformed(e.to_string()))
            }
        }
    }

    /// Acknowledge successful execution: drop the processing-list entry.
    pub async fn ack(&self, claimed: &ClaimedJob) -> Result<(), QueueError> {
        self.remove_processing_entry(&claimed.raw).await
    }

    /// Move a job whose retry budget is exhausted to the dead-letter list.
    pub async fn dead_letter(
        &self,
        claimed: &ClaimedJob,
        error: &str,
        attempts: u32,
    ) -> Result<(), QueueError> {
        let record = DeadLetter::new(claimed.job.clone(), error.to_string(), attempts);
        let payload =
            serde_json::to_string(&record).map_err(|e| QueueError::Malformed(e.to_string()))?;

        let mut redis = self.redis.clone();
        redis::cmd("LPUSH")
            .arg(self.dead_letter_key())
            .arg(&payload)
            .query_async::<_, ()>(&mut redis)
            .await?;

        self.remove_processing_entry(&claimed.raw).await?;

        tracing::error!(
            job_id = %claimed.job.id,
            attempts,
            "Job moved to dead-letter list"
        );
        Ok(())
    }

    /// Number of jobs waiting on the queue.
    pub async fn len(&self) -> Result<usize, QueueError> {
        let mut redis = self.redis.clone();
        let len: usize = redis::cmd("LLEN")
            .arg(&self.queue_key)
            .query_async(&mut redis)
            .await?;
        Ok(len)
    }

    /// Number of dead-lettered jobs awaiting inspection.
    pub async fn dead_letter_len(&self) -> Result<usize, QueueError> {
        let mut redis = self.redis.clone();
        let len: usize = redis::cmd("LLEN")
            .arg(self.dead_letter_key())
            .query_async(&mut redis)
            .await?;
        Ok(len)
    }

    async fn remove_processing_entry(&self, raw: &str) -> Result<(), QueueError> {
        let mut redis = self.redis.clone();
        redis::cmd("LREM")
            .arg(self.processing_key())
            .arg(1)
            .arg(raw)
            .query_async::<_, ()>(&mut redis)
            .await?;
        Ok(())
    }
}
