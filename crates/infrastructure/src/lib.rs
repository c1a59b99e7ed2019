//! Infrastructure layer - Adapters for the chaos engine
//!
//! Implements the ports defined in the application layer: the assault
//! executors and runtime assaults, randomness, metrics emission,
//! configuration loading and cron scheduling.

pub mod assaults;
pub mod config;
pub mod metrics;
pub mod random;
pub mod scheduler;
pub mod telemetry;

pub use assaults::{
    CpuAssault, ExceptionAssault, KillAssault, LatencyAssault, MemoryAssault, ProcessTerminator,
    SystemExit,
};
pub use config::{AssaultsConfig, ChaosConfig, ConfigError, CpuConfig, MemoryConfig, WatcherConfig};
pub use metrics::CounterMetrics;
pub use random::ThreadRngSource;
pub use scheduler::{AssaultScheduler, SchedulerError};
pub use telemetry::{TelemetryError, init_tracing};
