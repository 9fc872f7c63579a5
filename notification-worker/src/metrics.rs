use actix_web::{HttpResponse, Responder};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, TextEncoder};

/// Handler that serialises Prometheus metrics in text format.
pub async fn metrics_handler() -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => HttpResponse::Ok()
            .content_type(encoder.format_type())
            .body(buffer),
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

fn counter(name: &str, help: &str) -> IntCounter {
    let counter = IntCounter::new(name, help).expect("metric definition is valid");
    let _ = prometheus::default_registry().register(Box::new(counter.clone()));
    counter
}

/// Jobs executed to completion.
pub static JOBS_PROCESSED: Lazy<IntCounter> =
    Lazy::new(|| counter("jobs_processed_total", "Jobs executed successfully"));

/// Individual failed attempts (before retry classification).
pub static JOB_ATTEMPTS_FAILED: Lazy<IntCounter> =
    Lazy::new(|| counter("job_attempts_failed_total", "Failed job attempts"));

/// Jobs that exhausted their retry budget.
pub static JOBS_DEAD_LETTERED: Lazy<IntCounter> =
    Lazy::new(|| counter("jobs_dead_lettered_total", "Jobs moved to the dead-letter list"));
