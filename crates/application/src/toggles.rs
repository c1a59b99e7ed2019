//! Runtime toggle registry and toggle-name derivation
//!
//! Toggles flip watching off for one call site or one assault kind at
//! runtime, without a configuration reload and without redeploying. Lookups
//! are fail-open: a name nobody ever set reads as enabled, and a lookup never
//! fails.

use std::collections::HashMap;

use domain::{AssaultKind, CallSite};
use parking_lot::RwLock;

/// Derives toggle names from call sites and assault kinds
///
/// Injectable because deployments key their toggles differently: by full
/// method signature, by type name, or by schemes of their own. Strategies
/// hold no state; the prefix comes from the current settings snapshot on
/// every call, so a reload that changes it takes effect immediately.
pub trait ToggleNameStrategy: Send + Sync {
    /// Toggle name governing one call site
    fn call_site_toggle(&self, prefix: &str, site: &CallSite) -> String;

    /// Toggle name governing one assault kind
    fn assault_toggle(&self, prefix: &str, kind: &AssaultKind) -> String;
}

/// Keys call-site toggles by the full dotted method signature
///
/// `chaos.com.example.api.HelloController.hello` style names: the finest
/// granularity, one flag per method.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureToggleNames;

impl ToggleNameStrategy for SignatureToggleNames {
    fn call_site_toggle(&self, prefix: &str, site: &CallSite) -> String {
        format!("{prefix}.{}", site.signature())
    }

    fn assault_toggle(&self, prefix: &str, kind: &AssaultKind) -> String {
        format!("{prefix}.assault.{}", kind.name())
    }
}

/// Keys call-site toggles by the bare type name, one flag per component
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeToggleNames;

impl ToggleNameStrategy for TypeToggleNames {
    fn call_site_toggle(&self, prefix: &str, site: &CallSite) -> String {
        format!("{prefix}.{}", site.type_name())
    }

    fn assault_toggle(&self, prefix: &str, kind: &AssaultKind) -> String {
        format!("{prefix}.assault.{}", kind.name())
    }
}

/// Concurrent registry of named boolean toggles
///
/// The one structure mutated continuously while the process runs. Readers
/// take a shared lock for a single map lookup; writers take a short exclusive
/// lock for one insert or remove. The lock is never held across anything
/// slower than the map operation itself, so readers observe either the old or
/// the new value of a flag, never a torn state.
#[derive(Debug, Default)]
pub struct ToggleRegistry {
    flags: RwLock<HashMap<String, bool>>,
}

impl ToggleRegistry {
    /// Create an empty registry; every name reads as enabled
    #[must_use]
    pub fn new() -> Self {
        Self {
            flags: RwLock::new(HashMap::new()),
        }
    }

    /// Current value for `name`; absent names are enabled (fail-open)
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags.read().get(name).copied().unwrap_or(true)
    }

    /// Whether `name` has ever been configured
    #[must_use]
    pub fn is_configured(&self, name: &str) -> bool {
        self.flags.read().contains_key(name)
    }

    /// Set the value for `name`; last write wins
    pub fn set_enabled(&self, name: impl Into<String>, enabled: bool) {
        self.flags.write().insert(name.into(), enabled);
    }

    /// Remove `name`, returning it to the unconfigured (enabled) state
    pub fn clear(&self, name: &str) {
        self.flags.write().remove(name);
    }

    /// Snapshot of every configured toggle, for administrative listing
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, bool> {
        self.flags.read().clone()
    }

    /// Number of configured toggles
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.read().len()
    }

    /// Whether no toggle has been configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Layer;
    use std::sync::Arc;

    fn site() -> CallSite {
        CallSite::new(Layer::Controller, "com.example.api", "HelloController", "hello")
    }

    #[test]
    fn absent_names_are_enabled() {
        let registry = ToggleRegistry::new();
        assert!(registry.is_enabled("never.set"));
        assert!(!registry.is_configured("never.set"));
    }

    #[test]
    fn set_enabled_overrides_and_last_write_wins() {
        let registry = ToggleRegistry::new();

        registry.set_enabled("chaos.HelloController", false);
        assert!(!registry.is_enabled("chaos.HelloController"));

        registry.set_enabled("chaos.HelloController", true);
        assert!(registry.is_enabled("chaos.HelloController"));
    }

    #[test]
    fn clear_returns_name_to_fail_open() {
        let registry = ToggleRegistry::new();

        registry.set_enabled("chaos.flag", false);
        assert!(!registry.is_enabled("chaos.flag"));

        registry.clear("chaos.flag");
        assert!(registry.is_enabled("chaos.flag"));
        assert!(!registry.is_configured("chaos.flag"));
    }

    #[test]
    fn snapshot_lists_configured_toggles() {
        let registry = ToggleRegistry::new();
        registry.set_enabled("a", false);
        registry.set_enabled("b", true);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("a"), Some(&false));
        assert_eq!(snapshot.get("b"), Some(&true));
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }

    #[test]
    fn concurrent_reads_and_writes_stay_consistent() {
        let registry = Arc::new(ToggleRegistry::new());
        let mut handles = Vec::new();

        for i in 0..4 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for round in 0..500 {
                    registry.set_enabled("contended", (round + i) % 2 == 0);
                }
            }));
        }
        for _ in 0..4 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for _ in 0..2000 {
                    // A read is always a plain bool, whatever the writers do
                    let value = registry.is_enabled("contended");
                    assert!(value || !value);
                }
            }));
        }

        for handle in handles {
            handle.join().expect("thread panicked");
        }

        assert!(registry.is_configured("contended"));
    }

    #[test]
    fn signature_strategy_derives_full_method_names() {
        let names = SignatureToggleNames;
        assert_eq!(
            names.call_site_toggle("chaos", &site()),
            "chaos.com.example.api.HelloController.hello"
        );
        assert_eq!(
            names.assault_toggle("chaos", &AssaultKind::Latency),
            "chaos.assault.latency"
        );
    }

    #[test]
    fn type_strategy_derives_bare_type_names() {
        let names = TypeToggleNames;
        assert_eq!(names.call_site_toggle("chaos", &site()), "chaos.HelloController");
        assert_eq!(
            names.assault_toggle("chaos", &AssaultKind::KillApplication),
            "chaos.assault.kill_application"
        );
    }

    #[test]
    fn strategies_track_the_prefix_they_are_given() {
        let names = SignatureToggleNames;
        assert!(names
            .call_site_toggle("resilience", &site())
            .starts_with("resilience."));
    }

    #[test]
    fn custom_kind_toggle_uses_its_name() {
        let names = SignatureToggleNames;
        let kind = AssaultKind::Custom("flaky_cache".to_string());
        assert_eq!(names.assault_toggle("chaos", &kind), "chaos.assault.flaky_cache");
    }
}
