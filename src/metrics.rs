//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // OAuth Metrics
    pub static ref OAUTH_CALLBACKS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("repodeck_oauth_callbacks_total", "Total number of OAuth callbacks by outcome"),
        &["outcome"]
    ).expect("metric can be created");
    pub static ref OAUTH_LOGINS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("repodeck_oauth_logins_total", "Total number of login redirects issued"),
        &["kind"]
    ).expect("metric can be created");

    // Upstream (GitHub) Metrics
    pub static ref UPSTREAM_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("repodeck_upstream_requests_total", "Total number of GitHub requests"),
        &["endpoint", "status"]
    ).expect("metric can be created");
    pub static ref UPSTREAM_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "repodeck_upstream_request_duration_seconds",
            "GitHub request duration in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["endpoint"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("repodeck_errors_total", "Total number of errors"),
        &["error_type"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
///
/// Safe to call more than once; repeated registrations are ignored.
pub fn init_metrics() {
    let collectors: [(&str, Box<dyn prometheus::core::Collector>); 5] = [
        ("OAUTH_CALLBACKS_TOTAL", Box::new(OAUTH_CALLBACKS_TOTAL.clone())),
        ("OAUTH_LOGINS_TOTAL", Box::new(OAUTH_LOGINS_TOTAL.clone())),
        ("UPSTREAM_REQUESTS_TOTAL", Box::new(UPSTREAM_REQUESTS_TOTAL.clone())),
        (
            "UPSTREAM_REQUEST_DURATION_SECONDS",
            Box::new(UPSTREAM_REQUEST_DURATION_SECONDS.clone()),
        ),
        ("ERRORS_TOTAL", Box::new(ERRORS_TOTAL.clone())),
    ];

    for (name, collector) in collectors {
        match REGISTRY.register(collector) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(error) => tracing::warn!(metric = name, %error, "Failed to register metric"),
        }
    }

    tracing::info!("Metrics registry initialized");
}

/// Record the outcome of an upstream call.
pub fn observe_upstream(endpoint: &str, status: &str, elapsed: std::time::Duration) {
    UPSTREAM_REQUESTS_TOTAL
        .with_label_values(&[endpoint, status])
        .inc();
    UPSTREAM_REQUEST_DURATION_SECONDS
        .with_label_values(&[endpoint])
        .observe(elapsed.as_secs_f64());
}
