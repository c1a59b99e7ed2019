//! Concrete assault implementations
//!
//! Request-scoped executors (latency, exception, kill) implement the
//! `AssaultExecutor` port; process-wide assaults (memory, CPU, scheduled
//! kill) implement `RuntimeAssault`. The kill assault implements both.

mod cpu;
mod exception;
mod kill;
mod latency;
mod memory;

pub use cpu::CpuAssault;
pub use exception::ExceptionAssault;
pub use kill::{KillAssault, ProcessTerminator, SystemExit};
pub use latency::LatencyAssault;
pub use memory::MemoryAssault;
