//! Application layer - Decision orchestration and ports
//!
//! Contains the watcher gate, assault selector and chaos engine, the runtime
//! toggle registry, the validated settings aggregate, and the port
//! definitions that infrastructure adapters implement.

pub mod ports;
pub mod request_context;
pub mod services;
pub mod settings;
pub mod toggles;

pub use ports::*;
pub use request_context::{AssaultGuard, RequestContext};
pub use services::*;
pub use settings::{
    AssaultSettings, ChaosSettings, CpuAssaultSettings, MemoryAssaultSettings, WatcherScope,
};
pub use toggles::{SignatureToggleNames, ToggleNameStrategy, ToggleRegistry, TypeToggleNames};
