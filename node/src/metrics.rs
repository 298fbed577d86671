//! # Prometheus Metrics
//!
//! Counters and gauges for a replay run, rendered in the Prometheus text
//! format when `apply --metrics` is given.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] so they
//! do not collide with any default global registry consumers.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Holds all Prometheus metric handles for the ledger host.
#[derive(Clone)]
pub struct LedgerMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Calls processed, by operation and outcome (`ok` or the reason code).
    pub calls_total: IntCounterVec,
    /// Events appended to the ledger log.
    pub events_emitted_total: IntCounter,
    /// Accounts with a non-zero balance.
    pub holders: IntGauge,
    /// Time spent applying a single call, in seconds.
    pub call_latency_seconds: Histogram,
}

impl LedgerMetrics {
    /// Creates and registers all metrics.
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("ledger".into()), None)?;

        let calls_total = IntCounterVec::new(
            Opts::new("calls_total", "Ledger calls processed, by operation and outcome"),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(calls_total.clone()))?;

        let events_emitted_total =
            IntCounter::new("events_emitted_total", "Events appended to the ledger log")?;
        registry.register(Box::new(events_emitted_total.clone()))?;

        let holders = IntGauge::new("holders", "Accounts with a non-zero balance")?;
        registry.register(Box::new(holders.clone()))?;

        let call_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "call_latency_seconds",
                "Time to admit and apply one ledger call, in seconds",
            )
            .buckets(vec![
                0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01,
            ]),
        )?;
        registry.register(Box::new(call_latency_seconds.clone()))?;

        Ok(Self {
            registry,
            calls_total,
            events_emitted_total,
            holders,
            call_latency_seconds,
        })
    }

    /// Records one processed call.
    pub fn observe_call(&self, operation: &str, outcome: &str, events: usize, seconds: f64) {
        self.calls_total
            .with_label_values(&[operation, outcome])
            .inc();
        self.events_emitted_total.inc_by(events as u64);
        self.call_latency_seconds.observe(seconds);
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
