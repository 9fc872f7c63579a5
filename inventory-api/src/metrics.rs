use actix_web::{HttpResponse, Responder};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, TextEncoder};

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

/// Authorization rejections by stable error code.
pub static AUTH_REJECTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    let vec = IntCounterVec::new(
        Opts::new("auth_rejections_total", "Authorization gate rejections"),
        &["code"],
    )
    .expect("auth_rejections_total metric definition is valid");
    let _ = prometheus::default_registry().register(Box::new(vec.clone()));
    vec
});

/// Notification jobs enqueued by the registration flow.
pub static JOBS_ENQUEUED: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::new("jobs_enqueued_total", "Notification jobs enqueued")
        .expect("jobs_enqueued_total metric definition is valid");
    let _ = prometheus::default_registry().register(Box::new(counter.clone()));
    counter
});

pub fn record_auth_rejection(code: &str) {
    AUTH_REJECTIONS.with_label_values(&[code]).inc();
}
