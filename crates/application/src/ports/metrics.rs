//! Metrics port for terminal decision reporting
//!
//! The engine notifies this collaborator once per intercepted call with the
//! final decision and its outcome, and whenever the decision path observes a
//! configuration anomaly. Transport is the adapter's concern.

use chrono::{DateTime, Utc};
use domain::{CallSite, Decision};
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use uuid::Uuid;

use crate::request_context::RequestContext;

/// How one intercepted call ultimately ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Outside scope, toggled off, excluded, or the engine disabled
    NotWatched,
    /// Watched, but no assault fired
    Passed,
    /// An assault completed its effect and the call proceeded
    Applied,
    /// The exception assault raised its configured error
    ErrorRaised,
    /// The kill assault ran and the process is ending
    Terminated,
    /// The chosen executor malfunctioned; the call proceeded unharmed
    Failed,
}

impl Outcome {
    /// Stable label for metrics and logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotWatched => "not_watched",
            Self::Passed => "passed",
            Self::Applied => "applied",
            Self::ErrorRaised => "error_raised",
            Self::Terminated => "terminated",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Terminal report for one decision
#[derive(Debug, Clone, Serialize)]
pub struct DecisionReport {
    /// Which request produced the decision
    pub request_id: Uuid,
    /// When the report was assembled
    pub at: DateTime<Utc>,
    /// The intercepted call
    pub call_site: CallSite,
    /// The verdict
    pub decision: Decision,
    /// How the call ended
    pub outcome: Outcome,
}

impl DecisionReport {
    /// Assemble a report for the given context
    #[must_use]
    pub fn new(ctx: &RequestContext, decision: Decision, outcome: Outcome) -> Self {
        Self {
            request_id: ctx.request_id(),
            at: Utc::now(),
            call_site: ctx.call_site().clone(),
            decision,
            outcome,
        }
    }
}

/// Collaborator notified of terminal decisions and configuration anomalies
#[cfg_attr(test, automock)]
pub trait MetricsPort: Send + Sync {
    /// Record one terminal decision
    fn record_decision(&self, report: &DecisionReport);

    /// Record a configuration anomaly observed on the decision path, such as
    /// a fired draw finding no active assault to run
    fn record_config_anomaly(&self, site: &CallSite, detail: &str);
}

/// Discards every report; the engine's default collaborator
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsPort for NoopMetrics {
    fn record_decision(&self, _report: &DecisionReport) {}

    fn record_config_anomaly(&self, _site: &CallSite, _detail: &str) {}
}
