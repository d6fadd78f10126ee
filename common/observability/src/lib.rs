use anyhow::{anyhow, Result};
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber used by the gateway binaries. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

/// Per-client request metrics for the payment gateway.
#[derive(Clone)]
pub struct GatewayMetrics {
    registry: Registry,
    requests: IntCounterVec,
    token_refreshes: IntCounterVec,
    request_duration_seconds: HistogramVec,
}

impl GatewayMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let requests = IntCounterVec::new(
            Opts::new(
                "eps_requests_total",
                "Gateway operations grouped by operation and outcome",
            ),
            &["operation", "outcome"],
        )?;
        let token_refreshes = IntCounterVec::new(
            Opts::new(
                "eps_token_refresh_total",
                "Bearer token refresh attempts grouped by result",
            ),
            &["result"],
        )?;
        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "eps_request_duration_seconds",
                "Round-trip latency of gateway HTTP calls",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["operation"],
        )?;
        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(token_refreshes.clone()))?;
        registry.register(Box::new(request_duration_seconds.clone()))?;
        Ok(Self {
            registry,
            requests,
            token_refreshes,
            request_duration_seconds,
        })
    }

    pub fn record_request(&self, operation: &str, outcome: &str) {
        self.requests.with_label_values(&[operation, outcome]).inc();
    }

    pub fn record_token_refresh(&self, success: bool) {
        let result = if success { "success" } else { "failure" };
        self.token_refreshes.with_label_values(&[result]).inc();
    }

    pub fn observe_duration(&self, operation: &str, seconds: f64) {
        self.request_duration_seconds
            .with_label_values(&[operation])
            .observe(seconds);
    }

    pub fn request_count(&self, operation: &str, outcome: &str) -> u64 {
        self.requests.with_label_values(&[operation, outcome]).get()
    }

    pub fn token_refresh_count(&self, success: bool) -> u64 {
        let result = if success { "success" } else { "failure" };
        self.token_refreshes.with_label_values(&[result]).get()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Prometheus text exposition of every metric in this instance's registry.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
