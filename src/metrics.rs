//! Prometheus Metrics Definitions
//!
//! This module holds the encoding conventions shared by every collector and the
//! exporter's own process metrics.
//!
//! # Metric Categories
//!
//! ## Per-scrape instrumentation
//! - `eseries_exporter_collect_error` - 1 if the collector failed during this scrape
//! - `eseries_exporter_collector_duration_seconds` - wall time spent in the collector
//!
//! Both are owned by [`ScrapeMetrics`], created once per scrape and shared by handle with
//! every collector of that scrape.
//!
//! ## Exporter process metrics (`/metrics`)
//! - `eseries_exporter_build_info` - constant 1, labelled with the crate version
//! - `eseries_exporter_scrapes_total` - scrape requests by module and HTTP status code
//!
//! # Encoding Conventions
//!
//! - **One-hot enums**: [`set_one_hot`] emits one series per known state plus `unknown`
//! - **Booleans**: [`bool_value`] maps to 1.0 / 0.0
//! - **Capacities**: [`parse_capacity`] turns the proxy's string byte counts into `f64`
//!
//! All metrics use the `eseries_` namespace prefix.

use prometheus::{Encoder, GaugeVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Instant;

pub const NAMESPACE: &str = "eseries";

/// Label value emitted for a status outside the known enumeration
pub const UNKNOWN: &str = "unknown";

/// Create an `eseries_<subsystem>_<name>` gauge vector
pub fn gauge_vec(
    subsystem: &str,
    name: &str,
    help: &str,
    labels: &[&str],
) -> prometheus::Result<GaugeVec> {
    GaugeVec::new(
        Opts::new(name, help)
            .namespace(NAMESPACE)
            .subsystem(subsystem),
        labels,
    )
}

/// Error and duration gauges shared by all collectors of one scrape
#[derive(Clone)]
pub struct ScrapeMetrics {
    pub collect_error: Arc<GaugeVec>,
    pub collector_duration_seconds: Arc<GaugeVec>,
}

impl ScrapeMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let collect_error = gauge_vec(
            "exporter",
            "collect_error",
            "Indicates if error has occurred during collection",
            &["collector"],
        )?;

        let collector_duration_seconds = gauge_vec(
            "exporter",
            "collector_duration_seconds",
            "Collector time duration.",
            &["collector"],
        )?;

        Ok(Self {
            collect_error: Arc::new(collect_error),
            collector_duration_seconds: Arc::new(collector_duration_seconds),
        })
    }

    pub fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.collect_error.as_ref().clone()))?;
        registry.register(Box::new(self.collector_duration_seconds.as_ref().clone()))?;
        Ok(())
    }

    /// Emit the error flag and the elapsed time since `started` for `collector`
    pub fn record(&self, collector: &str, failed: bool, started: Instant) {
        self.collect_error
            .with_label_values(&[collector])
            .set(bool_value(failed));
        self.collector_duration_seconds
            .with_label_values(&[collector])
            .set(started.elapsed().as_secs_f64());
    }
}

/// Set one series per entry of `states` plus an `unknown` series
///
/// `labels` are the entity labels; the state name is appended as the last label value.
/// Exactly one of the emitted series is 1: the matching state, or `unknown` when `actual`
/// matches none of `states`.
pub fn set_one_hot(metric: &GaugeVec, labels: &[&str], states: &[&str], actual: &str) {
    let mut values: Vec<&str> = Vec::with_capacity(labels.len() + 1);
    values.extend_from_slice(labels);
    values.push("");
    let last = values.len() - 1;

    for state in states {
        values[last] = *state;
        metric
            .with_label_values(values.as_slice())
            .set(bool_value(*state == actual));
    }

    values[last] = UNKNOWN;
    metric
        .with_label_values(values.as_slice())
        .set(bool_value(!states.contains(&actual)));
}

pub fn bool_value(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Parse a byte count serialised as a string; unparsable input counts as zero
pub fn parse_capacity(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(0.0)
}

/// `used / total`, or 0 when `total` is not positive
pub fn utilization_ratio(used: f64, total: f64) -> f64 {
    if total > 0.0 {
        used / total
    } else {
        0.0
    }
}

/// Render a registry in Prometheus text format
pub fn render(registry: &Registry) -> anyhow::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Process-wide metrics about the exporter itself
#[derive(Clone)]
pub struct ExporterMetrics {
    registry: Arc<Registry>,
    pub build_info: Arc<IntGaugeVec>,
    pub scrapes_total: Arc<IntCounterVec>,
}

impl ExporterMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let build_info = IntGaugeVec::new(
            Opts::new("build_info", "Exporter build information (value is always 1)")
                .namespace(NAMESPACE)
                .subsystem("exporter"),
            &["version"],
        )?;

        let scrapes_total = IntCounterVec::new(
            Opts::new("scrapes_total", "Scrape requests handled, by module and status code")
                .namespace(NAMESPACE)
                .subsystem("exporter"),
            &["module", "code"],
        )?;

        registry.register(Box::new(build_info.clone()))?;
        registry.register(Box::new(scrapes_total.clone()))?;

        build_info
            .with_label_values(&[env!("CARGO_PKG_VERSION")])
            .set(1);

        Ok(Self {
            registry: Arc::new(registry),
            build_info: Arc::new(build_info),
            scrapes_total: Arc::new(scrapes_total),
        })
    }

    pub fn observe_scrape(&self, module: &str, code: u16) {
        let code = code.to_string();
        self.scrapes_total
            .with_label_values(&[module, code.as_str()])
            .inc();
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> anyhow::Result<String> {
        render(&self.registry)
    }
}
