//! Chaos configuration loading
//!
//! Raw serde structs with per-field defaults, bound from an optional
//! `chaos.toml` plus `CHAOS_`-prefixed environment overrides, then validated
//! into the settings aggregate. All structural invariants (level band,
//! latency ordering, runtime assault parameters, cron syntax) are enforced
//! here; the engine never starts on a malformed configuration.

use std::path::Path;

use application::{AssaultSettings, ChaosSettings, CpuAssaultSettings, MemoryAssaultSettings, WatcherScope};
use domain::{DomainError, ExclusionList, LatencyRange, Level};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The underlying source failed to load or deserialize
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value failed domain validation
    #[error("Invalid configuration value: {0}")]
    Invalid(#[from] DomainError),

    /// A cron expression failed to parse
    #[error("Invalid cron expression '{expr}': {reason}")]
    InvalidCron { expr: String, reason: String },
}

/// Raw watcher section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Watch view-serving controllers
    #[serde(default)]
    pub controller: bool,

    /// Watch REST controllers
    #[serde(default)]
    pub rest_controller: bool,

    /// Watch service components
    #[serde(default)]
    pub service: bool,

    /// Watch repository components
    #[serde(default)]
    pub repository: bool,

    /// Watch host-defined custom components
    #[serde(default)]
    pub custom: bool,

    /// Call sites carved out of every watched layer
    #[serde(default)]
    pub exclude: ExclusionList,
}

/// Raw memory assault section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Whether the memory assault may strike
    #[serde(default)]
    pub active: bool,

    /// Total bytes to fill before holding
    #[serde(default = "default_fill_target_bytes")]
    pub fill_target_bytes: u64,

    /// Bytes allocated per step
    #[serde(default = "default_fill_increment_bytes")]
    pub fill_increment_bytes: u64,

    /// Pause between allocation steps in milliseconds
    #[serde(default = "default_wait_between_increases_ms")]
    pub wait_between_increases_ms: u64,

    /// How long the filled buffers are held in milliseconds
    #[serde(default = "default_hold_ms")]
    pub hold_filled_ms: u64,

    /// Cron expression scheduling the strike
    #[serde(default)]
    pub cron: Option<String>,
}

const fn default_fill_target_bytes() -> u64 {
    256 * 1024 * 1024
}

const fn default_fill_increment_bytes() -> u64 {
    16 * 1024 * 1024
}

const fn default_wait_between_increases_ms() -> u64 {
    1_000
}

const fn default_hold_ms() -> u64 {
    90_000
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            active: false,
            fill_target_bytes: default_fill_target_bytes(),
            fill_increment_bytes: default_fill_increment_bytes(),
            wait_between_increases_ms: default_wait_between_increases_ms(),
            hold_filled_ms: default_hold_ms(),
            cron: None,
        }
    }
}

/// Raw CPU assault section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuConfig {
    /// Whether the CPU assault may strike
    #[serde(default)]
    pub active: bool,

    /// Target load as a fraction of every core
    #[serde(default = "default_load_target")]
    pub load_target: f64,

    /// How long the load is held in milliseconds
    #[serde(default = "default_hold_ms")]
    pub hold_load_ms: u64,

    /// Cron expression scheduling the strike
    #[serde(default)]
    pub cron: Option<String>,
}

const fn default_load_target() -> f64 {
    0.9
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            active: false,
            load_target: default_load_target(),
            hold_load_ms: default_hold_ms(),
            cron: None,
        }
    }
}

/// Raw assaults section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssaultsConfig {
    /// Severity level in `[1, 10]`
    #[serde(default = "default_level")]
    pub level: u8,

    /// Whether the latency assault may fire
    #[serde(default)]
    pub latency_active: bool,

    /// Lower latency bound in milliseconds
    #[serde(default = "default_latency_range_start_ms")]
    pub latency_range_start_ms: u64,

    /// Upper latency bound in milliseconds
    #[serde(default = "default_latency_range_end_ms")]
    pub latency_range_end_ms: u64,

    /// Whether the exception assault may fire
    #[serde(default)]
    pub exceptions_active: bool,

    /// Messages the exception assault draws from
    #[serde(default)]
    pub exceptions: Vec<String>,

    /// Whether the kill assault may fire
    #[serde(default)]
    pub kill_application_active: bool,

    /// Cron expression for scheduled kills
    #[serde(default)]
    pub kill_application_cron: Option<String>,

    /// Services custom assaults are allowed to hit
    #[serde(default)]
    pub watched_custom_services: Vec<String>,

    /// Memory assault section
    #[serde(default)]
    pub memory: MemoryConfig,

    /// CPU assault section
    #[serde(default)]
    pub cpu: CpuConfig,
}

const fn default_level() -> u8 {
    1
}

const fn default_latency_range_start_ms() -> u64 {
    1_000
}

const fn default_latency_range_end_ms() -> u64 {
    3_000
}

impl Default for AssaultsConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            latency_active: false,
            latency_range_start_ms: default_latency_range_start_ms(),
            latency_range_end_ms: default_latency_range_end_ms(),
            exceptions_active: false,
            exceptions: Vec::new(),
            kill_application_active: false,
            kill_application_cron: None,
            watched_custom_services: Vec::new(),
            memory: MemoryConfig::default(),
            cpu: CpuConfig::default(),
        }
    }
}

/// Top-level chaos configuration as read from file and environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaosConfig {
    /// Master switch the engine starts with
    #[serde(default)]
    pub enabled: bool,

    /// Prefix for derived toggle names
    #[serde(default = "default_toggle_prefix")]
    pub toggle_prefix: String,

    /// Watcher section
    #[serde(default)]
    pub watcher: WatcherConfig,

    /// Assaults section
    #[serde(default)]
    pub assaults: AssaultsConfig,
}

fn default_toggle_prefix() -> String {
    ChaosSettings::DEFAULT_TOGGLE_PREFIX.to_string()
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            toggle_prefix: default_toggle_prefix(),
            watcher: WatcherConfig::default(),
            assaults: AssaultsConfig::default(),
        }
    }
}

impl ChaosConfig {
    /// Load from the conventional sources: an optional `chaos` file in the
    /// working directory, overridden by `CHAOS_`-prefixed environment
    /// variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` when a source fails to read or
    /// deserialize.
    pub fn load() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("chaos").required(false))
            .add_source(
                config::Environment::with_prefix("CHAOS")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load from an explicit file, still honoring environment overrides
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` when the file is missing, unreadable or
    /// fails to deserialize.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix("CHAOS")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate into the settings aggregate the engine runs on
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for domain violations (level band,
    /// latency ordering, runtime assault parameters) and
    /// `ConfigError::InvalidCron` for unparseable cron expressions.
    pub fn into_settings(self) -> Result<ChaosSettings, ConfigError> {
        validate_cron(self.assaults.kill_application_cron.as_deref())?;
        validate_cron(self.assaults.memory.cron.as_deref())?;
        validate_cron(self.assaults.cpu.cron.as_deref())?;

        let level = Level::new(self.assaults.level)?;
        let latency_range = LatencyRange::new(
            self.assaults.latency_range_start_ms,
            self.assaults.latency_range_end_ms,
        )?;

        let watcher = WatcherScope {
            controller: self.watcher.controller,
            rest_controller: self.watcher.rest_controller,
            service: self.watcher.service,
            repository: self.watcher.repository,
            custom: self.watcher.custom,
            exclusions: self.watcher.exclude,
        };

        let assaults = AssaultSettings {
            level,
            latency_active: self.assaults.latency_active,
            latency_range,
            exceptions_active: self.assaults.exceptions_active,
            exceptions: self.assaults.exceptions,
            kill_application_active: self.assaults.kill_application_active,
            kill_application_cron: self.assaults.kill_application_cron,
            watched_custom_services: self.assaults.watched_custom_services,
            memory: MemoryAssaultSettings {
                active: self.assaults.memory.active,
                fill_target_bytes: self.assaults.memory.fill_target_bytes,
                fill_increment_bytes: self.assaults.memory.fill_increment_bytes,
                wait_between_increases_ms: self.assaults.memory.wait_between_increases_ms,
                hold_filled_ms: self.assaults.memory.hold_filled_ms,
                cron: self.assaults.memory.cron,
            },
            cpu: CpuAssaultSettings {
                active: self.assaults.cpu.active,
                load_target: self.assaults.cpu.load_target,
                hold_load_ms: self.assaults.cpu.hold_load_ms,
                cron: self.assaults.cpu.cron,
            },
        };

        Ok(ChaosSettings::new(watcher, assaults)?
            .with_enabled(self.enabled)
            .with_toggle_prefix(self.toggle_prefix))
    }

    /// Load and validate in one step
    ///
    /// # Errors
    ///
    /// Propagates every loading and validation failure of [`Self::load`]
    /// and [`Self::into_settings`].
    pub fn load_settings() -> Result<ChaosSettings, ConfigError> {
        Self::load()?.into_settings()
    }
}

fn validate_cron(expr: Option<&str>) -> Result<(), ConfigError> {
    if let Some(expr) = expr {
        expr.parse::<cron::Schedule>()
            .map_err(|e| ConfigError::InvalidCron {
                expr: expr.to_string(),
                reason: e.to_string(),
            })?;
    }
    Ok(())
}
