//! Prometheus metrics for the analyze and download endpoints
//!
//! All metrics are registered in the default registry and exposed on `/metrics`.

use lazy_static::lazy_static;
use prometheus::{register_counter, register_counter_vec, register_histogram, Counter, CounterVec, Histogram};

lazy_static! {
    /// Analyze requests by outcome
    /// Labels: outcome (success/invalid_link/<resolver error subcategory>)
    pub static ref ANALYZE_REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "igdl_analyze_requests_total",
        "Total number of analyze requests by outcome",
        &["outcome"]
    )
    .unwrap();

    /// Time spent inside the resolver per analyze request
    pub static ref RESOLVE_DURATION_SECONDS: Histogram = register_histogram!(
        "igdl_resolve_duration_seconds",
        "Time spent resolving a post into media resources",
        vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .unwrap();

    /// Download proxy requests by outcome
    /// Labels: outcome (success/validation/upstream)
    pub static ref DOWNLOAD_REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "igdl_download_requests_total",
        "Total number of download proxy requests by outcome",
        &["outcome"]
    )
    .unwrap();

    /// Bytes streamed to clients through the download proxy
    pub static ref PROXIED_BYTES_TOTAL: Counter = register_counter!(
        "igdl_proxied_bytes_total",
        "Total number of bytes streamed through the download proxy"
    )
    .unwrap();
}

/// Initialize metrics (call this at startup to register all metrics)
pub fn init_metrics() {
    log::info!("Initializing metrics registry...");

    let _ = &*RESOLVE_DURATION_SECONDS;
    let _ = &*PROXIED_BYTES_TOTAL;

    // Pre-create common label combinations so they show up with 0 values
    for outcome in ["success", "invalid_link", "network", "not_found", "other"] {
        ANALYZE_REQUESTS_TOTAL.with_label_values(&[outcome]);
    }
    for outcome in ["success", "validation", "upstream"] {
        DOWNLOAD_REQUESTS_TOTAL.with_label_values(&[outcome]);
    }

    log::info!("Metrics registry initialized");
}

pub fn record_analyze(outcome: &str) {
    ANALYZE_REQUESTS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_download(outcome: &str) {
    DOWNLOAD_REQUESTS_TOTAL.with_label_values(&[outcome]).inc();
}
