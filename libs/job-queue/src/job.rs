use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Job kinds the notification worker knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    SendRegistrationEmail,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::SendRegistrationEmail => "send_registration_email",
        }
    }
}

/// A unit of deferred side-effect work.
///
/// Delivery is at-least-once: a worker crash between execution and ack
/// redelivers the job, so handlers must tolerate duplicates (resending a
/// welcome email is acceptable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationJob {
    pub id: Uuid,
    pub job_type: JobType,
    pub recipient_email: String,
    pub username: String,
    pub enqueued_at: DateTime<Utc>,
}

impl NotificationJob {
    /// Welcome email for a freshly registered account.
    pub fn registration_email(recipient_email: &str, username: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_type: JobType::SendRegistrationEmail,
            recipient_email: recipient_email.to_string(),
            username: username.to_string(),
            enqueued_at: Utc::now(),
        }
    }
}

/// Terminal record for a job whose retry budget is exhausted.
///
/// Held on the dead-letter list for manual inspection; never retried
/// automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadLetter {
    pub job: NotificationJob,
    pub error: String,
    pub attempts: u32,
    pub failed_at: DateTime<Utc>,
}

impl DeadLetter {
    pub fn new(job: NotificationJob, error: String, attempts: u32) -> Self {
        Self {
            job,
            error,
            attempts,
            failed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_email_job() {
        let job = NotificationJob::registration_email("alice@example.com", "alice");

        assert_eq!(job.job_type, JobType::SendRegistrationEmail);
        assert_eq!(job.recipient_email, "alice@example.com");
        assert_eq!(job.username, "alice");
    }

    #[test]
    fn test_job_ids_are_unique() {
        let a = NotificationJob::registration_email("a@example.com", "a");
        let b = NotificationJob::registration_email("a@example.com", "a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_job_type_wire_name() {
        let job = NotificationJob::registration_email("alice@example.com", "alice");
        let json = serde_json::to_value(&job).unwrap();

        // The wire name is part of the queue contract consumed by the worker.
        assert_eq!(json["job_type"], "send_registration_email");
        assert_eq!(JobType::SendRegistrationEmail.as_str(), "send_registration_email");
    }

    #[test]
    fn test_dead_letter_preserves_job_and_error() {
        let job = NotificationJob::registration_email("alice@example.com", "alice");
        let dead = DeadLetter::new(job.clone(), "mail API returned 503".to_string(), 5);

        assert_eq!(dead.job.id, job.id);
        assert_eq!(dead.attempts, 5);
        assert!(dead.error.contains("503"));
    }
}
