//! Counter-based metrics adapter
//!
//! Publishes terminal decisions and configuration anomalies to whatever
//! recorder the host application installed. Two series are emitted:
//! `chaos_decisions_total` labeled by outcome and assault, and the unlabeled
//! `chaos_config_anomalies_total`. Call-site detail stays in the logs; the
//! labels are kept low-cardinality on purpose.

use application::{DecisionReport, MetricsPort};
use domain::CallSite;

/// [`MetricsPort`] adapter backed by the `metrics` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct CounterMetrics;

impl CounterMetrics {
    /// Create the adapter; recorder installation is the host's concern
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MetricsPort for CounterMetrics {
    fn record_decision(&self, report: &DecisionReport) {
        let assault = report
            .decision
            .assault()
            .map_or_else(|| "none".to_string(), |kind| kind.name().to_string());
        metrics::counter!(
            "chaos_decisions_total",
            "outcome" => report.outcome.label(),
            "assault" => assault,
        )
        .increment(1);
    }

    fn record_config_anomaly(&self, _site: &CallSite, _detail: &str) {
        metrics::counter!("chaos_config_anomalies_total").increment(1);
    }
}
