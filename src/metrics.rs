use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Histogram, Encoder, TextEncoder, register_counter, register_counter_vec,
    register_histogram,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("startupquest_requests_total", "Total number of API requests").unwrap();
    pub static ref ADMIN_REJECTIONS: CounterVec = register_counter_vec!(
        "startupquest_admin_rejections_total",
        "Admin requests turned away by the gate",
        &["kind"]
    )
    .unwrap();
    pub static ref SYNC_ITEMS: CounterVec = register_counter_vec!(
        "startupquest_sync_items_total",
        "Content files processed by sync, by outcome",
        &["source", "outcome"]
    )
    .unwrap();
    pub static ref SYNC_LATENCY: Histogram = register_histogram!(
        "startupquest_sync_latency_seconds",
        "Time spent in a file to database sync"
    )
    .unwrap();
    pub static ref JOBS_PROCESSED: CounterVec = register_counter_vec!(
        "startupquest_jobs_processed_total",
        "Jobs handled by the worker",
        &["kind"]
    )
    .unwrap();
}

// Text exposition of everything registered above
pub fn render() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("encode metrics: {e}"))?;
    String::from_utf8(buffer).map_err(|e| format!("metrics not utf-8: {e}"))
}
