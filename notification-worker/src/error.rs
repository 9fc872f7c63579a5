use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Mail API request failed: {0}")]
    MailTransport(#[from] reqwest::Error),

    #[error("Mail API rejected the message: {status} {body}")]
    MailRejected {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Queue error: {0}")]
    Queue(#[from] job_queue::QueueError),

    #[error("Job execution failed: {0}")]
    JobExecutionFailed(String),
}

impl WorkerError {
    /// Transient failures are retried; permanent rejections go straight to
    /// the dead-letter list.
    pub fn is_retryable(&self) -> bool {
        match self {
            WorkerError::MailTransport(_) => true,
            WorkerError::MailRejected { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            WorkerError::Queue(_) => true,
            WorkerError::JobExecutionFailed(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_retryable() {
        let err = WorkerError::MailRejected {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_rate_limit_is_retryable() {
        let err = WorkerError::MailRejected {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        let err = WorkerError::MailRejected {
            status: reqwest::StatusCode::BAD_REQUEST,
            body: "bad address".to_string(),
        };
        assert!(!err.is_retryable());
    }
}
