//! Watch scoping for intercepted calls
//!
//! Decides whether a call site is in scope at all, before any randomness.
//! The checks run cheapest-first: layer flag, then exclusions, then the
//! runtime toggle. Only the toggle lookup touches shared mutable state.

use domain::{CallSite, Decision};
use tracing::trace;

use crate::settings::WatcherScope;
use crate::toggles::{ToggleNameStrategy, ToggleRegistry};

/// Why a call site is, or is not, in scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchVerdict {
    /// In scope; the selector may roll for it
    Watched,
    /// The site's layer is not watched
    LayerNotWatched,
    /// An exclusion rule carved the site out
    Excluded,
    /// The site's runtime toggle is off
    ToggledOff,
}

impl WatchVerdict {
    /// Whether the selector should consider the site
    #[must_use]
    pub const fn is_watched(self) -> bool {
        matches!(self, Self::Watched)
    }

    /// The early decision this verdict maps to, if the site is out of scope
    #[must_use]
    pub const fn early_decision(self) -> Option<Decision> {
        match self {
            Self::Watched => None,
            Self::LayerNotWatched | Self::ToggledOff => Some(Decision::not_watched()),
            Self::Excluded => Some(Decision::excluded()),
        }
    }
}

/// Scopes one call against one settings snapshot
///
/// Borrows everything it needs; built fresh per decision so a concurrent
/// reload can never mix fields from two snapshots.
pub struct WatcherGate<'a> {
    scope: &'a WatcherScope,
    toggles: &'a ToggleRegistry,
    names: &'a dyn ToggleNameStrategy,
    toggle_prefix: &'a str,
}

impl<'a> WatcherGate<'a> {
    /// Assemble a gate over borrowed collaborators
    #[must_use]
    pub const fn new(
        scope: &'a WatcherScope,
        toggles: &'a ToggleRegistry,
        names: &'a dyn ToggleNameStrategy,
        toggle_prefix: &'a str,
    ) -> Self {
        Self {
            scope,
            toggles,
            names,
            toggle_prefix,
        }
    }

    /// Evaluate whether `site` is in scope
    #[must_use]
    pub fn evaluate(&self, site: &CallSite) -> WatchVerdict {
        if !self.scope.watches(site.layer()) {
            trace!(site = %site, "layer not watched");
            return WatchVerdict::LayerNotWatched;
        }

        if self.scope.exclusions.excludes(site) {
            trace!(site = %site, "call site excluded");
            return WatchVerdict::Excluded;
        }

        let toggle = self.names.call_site_toggle(self.toggle_prefix, site);
        if !self.toggles.is_enabled(&toggle) {
            trace!(site = %site, toggle = %toggle, "call site toggled off");
            return WatchVerdict::ToggledOff;
        }

        WatchVerdict::Watched
    }
}
