//! Validated chaos configuration
//!
//! `ChaosSettings` is the read-mostly aggregate the engine snapshots behind
//! an atomic swap. Every invariant is enforced while the value is built
//! (level band, latency ordering, runtime assault parameters), so a
//! constructed settings value is always safe to act on and nothing is
//! re-validated or clamped on the decision path.

use domain::{CallSite, DomainError, ExclusionList, LatencyRange, Layer, Level};
use serde::Serialize;

/// Which layers are watched and which call sites are carved out
///
/// Ships with every layer off; hosts opt layers in explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WatcherScope {
    /// Watch view-serving controllers
    pub controller: bool,
    /// Watch REST controllers
    pub rest_controller: bool,
    /// Watch service components
    pub service: bool,
    /// Watch repository components
    pub repository: bool,
    /// Watch host-defined custom components
    pub custom: bool,
    /// Call sites carved out of every watched layer
    pub exclusions: ExclusionList,
}

impl WatcherScope {
    /// Whether calls in `layer` are considered at all
    #[must_use]
    pub const fn watches(&self, layer: Layer) -> bool {
        match layer {
            Layer::Controller => self.controller,
            Layer::RestController => self.rest_controller,
            Layer::Service => self.service,
            Layer::Repository => self.repository,
            Layer::Custom => self.custom,
        }
    }

    /// A scope watching every layer, convenient for tests and demos
    #[must_use]
    pub fn all_layers() -> Self {
        Self {
            controller: true,
            rest_controller: true,
            service: true,
            repository: true,
            custom: true,
            exclusions: ExclusionList::new(),
        }
    }
}

/// Runtime memory assault parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryAssaultSettings {
    /// Whether the memory assault may strike
    pub active: bool,
    /// Total bytes to fill before holding
    pub fill_target_bytes: u64,
    /// Bytes allocated per step
    pub fill_increment_bytes: u64,
    /// Pause between allocation steps
    pub wait_between_increases_ms: u64,
    /// How long the filled buffers are held before release
    pub hold_filled_ms: u64,
    /// Cron expression scheduling the strike, if any
    pub cron: Option<String>,
}

impl Default for MemoryAssaultSettings {
    fn default() -> Self {
        Self {
            active: false,
            fill_target_bytes: 256 * 1024 * 1024,
            fill_increment_bytes: 16 * 1024 * 1024,
            wait_between_increases_ms: 1_000,
            hold_filled_ms: 90_000,
            cron: None,
        }
    }
}

impl MemoryAssaultSettings {
    fn validate(&self) -> Result<(), DomainError> {
        if self.fill_increment_bytes == 0 {
            return Err(DomainError::InvalidMemoryFill(
                "fill_increment_bytes must be greater than zero".to_string(),
            ));
        }
        if self.fill_target_bytes < self.fill_increment_bytes {
            return Err(DomainError::InvalidMemoryFill(format!(
                "fill_target_bytes {} is smaller than one increment of {}",
                self.fill_target_bytes, self.fill_increment_bytes
            )));
        }
        Ok(())
    }
}

/// Runtime CPU assault parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuAssaultSettings {
    /// Whether the CPU assault may strike
    pub active: bool,
    /// Target load as a fraction of every core, in (0.0, 1.0]
    pub load_target: f64,
    /// How long the load is held
    pub hold_load_ms: u64,
    /// Cron expression scheduling the strike, if any
    pub cron: Option<String>,
}

impl Default for CpuAssaultSettings {
    fn default() -> Self {
        Self {
            active: false,
            load_target: 0.9,
            hold_load_ms: 90_000,
            cron: None,
        }
    }
}

impl CpuAssaultSettings {
    fn validate(&self) -> Result<(), DomainError> {
        // The negation also rejects NaN
        if !(self.load_target > 0.0 && self.load_target <= 1.0) {
            return Err(DomainError::InvalidLoadTarget(self.load_target));
        }
        Ok(())
    }
}

/// Request-scoped and runtime assault configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssaultSettings {
    /// Severity level; trigger probability is `level / 10`
    pub level: Level,
    /// Whether the latency assault may fire
    pub latency_active: bool,
    /// Window the latency assault draws from
    pub latency_range: LatencyRange,
    /// Whether the exception assault may fire
    pub exceptions_active: bool,
    /// Messages the exception assault draws from; empty uses a fixed default
    pub exceptions: Vec<String>,
    /// Whether the kill assault may fire
    pub kill_application_active: bool,
    /// Cron expression for scheduled kills, if any
    pub kill_application_cron: Option<String>,
    /// Qualified type names or signatures custom assaults are allowed to hit
    pub watched_custom_services: Vec<String>,
    /// Runtime memory assault parameters
    pub memory: MemoryAssaultSettings,
    /// Runtime CPU assault parameters
    pub cpu: CpuAssaultSettings,
}

impl Default for AssaultSettings {
    fn default() -> Self {
        Self {
            level: Level::default(),
            latency_active: false,
            latency_range: LatencyRange::default(),
            exceptions_active: false,
            exceptions: Vec::new(),
            kill_application_active: false,
            kill_application_cron: None,
            watched_custom_services: Vec::new(),
            memory: MemoryAssaultSettings::default(),
            cpu: CpuAssaultSettings::default(),
        }
    }
}

impl AssaultSettings {
    /// Check the invariants the type system cannot carry
    ///
    /// `Level` and `LatencyRange` are valid by construction; this covers the
    /// runtime assault parameters.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.memory.validate()?;
        self.cpu.validate()
    }

    /// Whether `site` appears in the watched custom services list
    ///
    /// Matches the qualified type name or the full signature; an empty list
    /// admits nothing, so custom executors stay inert until services are
    /// named explicitly.
    #[must_use]
    pub fn watches_custom_service(&self, site: &CallSite) -> bool {
        if self.watched_custom_services.is_empty() {
            return false;
        }
        let qualified = site.qualified_type();
        let signature = site.signature();
        self.watched_custom_services.iter().any(|entry| {
            let name = entry.replace("::", ".");
            name == qualified || name == signature
        })
    }
}

/// The complete validated settings aggregate
///
/// Treated as immutable between reloads; the engine swaps whole values, never
/// individual fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChaosSettings {
    enabled: bool,
    toggle_prefix: String,
    watcher: WatcherScope,
    assaults: AssaultSettings,
}

impl ChaosSettings {
    /// Prefix used for toggle names when none is configured
    pub const DEFAULT_TOGGLE_PREFIX: &'static str = "chaos";

    /// Build a settings aggregate, rejecting invalid assault parameters
    ///
    /// The engine ships dark: `enabled` starts false and the toggle prefix
    /// starts at [`Self::DEFAULT_TOGGLE_PREFIX`]; flip them with the `with_*`
    /// builders.
    ///
    /// # Errors
    ///
    /// Returns the underlying `DomainError` when the assault settings fail
    /// validation.
    pub fn new(watcher: WatcherScope, assaults: AssaultSettings) -> Result<Self, DomainError> {
        assaults.validate()?;
        Ok(Self {
            enabled: false,
            toggle_prefix: Self::DEFAULT_TOGGLE_PREFIX.to_string(),
            watcher,
            assaults,
        })
    }

    /// Set the master switch the engine starts with
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Replace the toggle-name prefix
    #[must_use]
    pub fn with_toggle_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.toggle_prefix = prefix.into();
        self
    }

    /// Whether the engine starts enabled
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Prefix for derived toggle names
    #[must_use]
    pub fn toggle_prefix(&self) -> &str {
        &self.toggle_prefix
    }

    /// Watcher scope and exclusions
    #[must_use]
    pub const fn watcher(&self) -> &WatcherScope {
        &self.watcher
    }

    /// Assault configuration
    #[must_use]
    pub const fn assaults(&self) -> &AssaultSettings {
        &self.assaults
    }
}

impl Default for ChaosSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            toggle_prefix: Self::DEFAULT_TOGGLE_PREFIX.to_string(),
            watcher: WatcherScope::default(),
            assaults: AssaultSettings::default(),
        }
    }
}
