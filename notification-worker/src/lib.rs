pub mod config;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod metrics;
pub mod retry;
pub mod worker;

pub use config::Settings;
pub use error::{Result, WorkerError};
pub use worker::Worker;
