//! Prometheus metrics for the Stand With Crypto backend.

use prometheus::{
    register_histogram_vec_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, Encoder, HistogramVec, IntCounter, IntCounterVec, Registry,
    TextEncoder,
};

/// Metrics collector.
///
/// Each instance owns its registry so several collectors can coexist in one
/// process (tests, embedded servers).
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    match_comparisons: IntCounter,
    matches_found: IntCounter,
    direct_matches: IntCounter,
    match_rejections: IntCounterVec,
    sms_sent: IntCounter,
    sms_failed: IntCounter,
    events_emitted: IntCounterVec,
    request_latency: HistogramVec,
}

impl Metrics {
    /// Create a new metrics instance.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let match_comparisons = register_int_counter_with_registry!(
            "swc_match_comparisons_total",
            "Total number of DTSI/DDHQ candidate comparisons",
            registry
        )?;

        let matches_found = register_int_counter_with_registry!(
            "swc_matches_found_total",
            "Total number of DTSI people matched to a DDHQ candidate",
            registry
        )?;

        let direct_matches = register_int_counter_with_registry!(
            "swc_direct_matches_total",
            "Total number of matches found by exact normalized name",
            registry
        )?;

        let match_rejections = register_int_counter_vec_with_registry!(
            "swc_match_rejections_total",
            "Candidate comparisons rejected, by reason",
            &["reason"],
            registry
        )?;

        let sms_sent = register_int_counter_with_registry!(
            "swc_sms_sent_total",
            "Total number of SMS messages accepted by the provider",
            registry
        )?;

        let sms_failed = register_int_counter_with_registry!(
            "swc_sms_failed_total",
            "Total number of SMS messages the provider rejected",
            registry
        )?;

        let events_emitted = register_int_counter_vec_with_registry!(
            "swc_workflow_events_total",
            "Workflow events emitted, by event name",
            &["event"],
            registry
        )?;

        let request_latency = register_histogram_vec_with_registry!(
            "swc_http_request_duration_seconds",
            "HTTP handler latency in seconds",
            &["route"],
            registry
        )?;

        Ok(Self {
            registry,
            match_comparisons,
            matches_found,
            direct_matches,
            match_rejections,
            sms_sent,
            sms_failed,
            events_emitted,
            request_latency,
        })
    }

    pub fn inc_match_comparisons(&self, count: u64) {
        self.match_comparisons.inc_by(count);
    }

    pub fn inc_matches_found(&self, count: u64) {
        self.matches_found.inc_by(count);
    }

    pub fn inc_direct_matches(&self, count: u64) {
        self.direct_matches.inc_by(count);
    }

    /// Count a rejected comparison under `reason` (e.g. "district_mismatch").
    pub fn inc_match_rejection(&self, reason: &str) {
        self.match_rejections.with_label_values(&[reason]).inc();
    }

    pub fn inc_sms_sent(&self) {
        self.sms_sent.inc();
    }

    pub fn inc_sms_failed(&self) {
        self.sms_failed.inc();
    }

    pub fn inc_events_emitted(&self, event: &str) {
        self.events_emitted.with_label_values(&[event]).inc();
    }

    /// Record handler latency.
    pub fn observe_request_latency(&self, route: &str, duration_secs: f64) {
        self.request_latency.with_label_values(&[route]).observe(duration_secs);
    }

    /// Get Prometheus metrics in text exposition format.
    pub fn gather(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instances_do_not_collide() {
        let first = Metrics::new().unwrap();
        let second = Metrics::new().unwrap();
        first.inc_matches_found(2);
        second.inc_matches_found(5);

        assert!(first.gather().unwrap().contains("swc_matches_found_total 2"));
        assert!(second.gather().unwrap().contains("swc_matches_found_total 5"));
    }

    #[test]
    fn test_labelled_counters_are_exported() {
        let metrics = Metrics::new().unwrap();
        metrics.inc_match_rejection("district_mismatch");
        metrics.inc_events_emitted("capitol-canary.upsert-advocate");

        let text = metrics.gather().unwrap();
        assert!(text.contains(r#"swc_match_rejections_total{reason="district_mismatch"} 1"#));
        assert!(text.contains(r#"swc_workflow_events_total{event="capitol-canary.upsert-advocate"} 1"#));
    }
}
