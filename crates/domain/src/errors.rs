//! Domain-level errors

use thiserror::Error;

/// Errors that can occur while validating chaos configuration values
#[derive(Debug, Error)]
pub enum DomainError {
    /// Assault level outside the permitted band
    #[error("Invalid assault level: {0} (must be between 1 and 10)")]
    InvalidLevel(u8),

    /// Latency window whose start exceeds its end
    #[error("Invalid latency range: start {start_ms}ms exceeds end {end_ms}ms")]
    InvalidLatencyRange { start_ms: u64, end_ms: u64 },

    /// CPU load target outside (0.0, 1.0]
    #[error("Invalid CPU load target: {0} (must be within (0.0, 1.0])")]
    InvalidLoadTarget(f64),

    /// Memory fill parameters that can never make progress
    #[error("Invalid memory fill: {0}")]
    InvalidMemoryFill(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
