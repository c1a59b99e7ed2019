//! Port definitions for application layer
//!
//! Ports are interfaces that define how the engine reaches collaborators it
//! does not own: the assault effects, the randomness source and the metrics
//! sink. Adapters in the infrastructure layer implement these ports.

mod assault;
mod metrics;
mod random;

#[cfg(test)]
pub use assault::{MockAssaultExecutor, MockRuntimeAssault};
pub use assault::{AssaultError, AssaultExecutor, RuntimeAssault};
#[cfg(test)]
pub use metrics::MockMetricsPort;
pub use metrics::{DecisionReport, MetricsPort, NoopMetrics, Outcome};
#[cfg(test)]
pub use random::MockRandomSource;
pub use random::RandomSource;
