//! Probability roll and assault selection
//!
//! Runs only for calls the gate let through. One uniform draw decides
//! whether anything fires; a second uniform draw picks among the assaults
//! eligible for this call. Eligibility is re-derived per decision from the
//! settings snapshot, the assault toggles, and the call itself.

use std::sync::Arc;

use domain::Decision;
use tracing::{trace, warn};

use crate::ports::{AssaultExecutor, MetricsPort, RandomSource};
use crate::request_context::RequestContext;
use crate::settings::AssaultSettings;
use crate::toggles::{ToggleNameStrategy, ToggleRegistry};

/// Selects an assault for one watched call against one settings snapshot
///
/// Borrowed-view collaborator like the gate; assembled per decision.
pub struct AssaultSelector<'a> {
    assaults: &'a AssaultSettings,
    toggles: &'a ToggleRegistry,
    names: &'a dyn ToggleNameStrategy,
    toggle_prefix: &'a str,
    rng: &'a dyn RandomSource,
    metrics: &'a dyn MetricsPort,
}

impl<'a> AssaultSelector<'a> {
    /// Assemble a selector over borrowed collaborators
    #[must_use]
    pub const fn new(
        assaults: &'a AssaultSettings,
        toggles: &'a ToggleRegistry,
        names: &'a dyn ToggleNameStrategy,
        toggle_prefix: &'a str,
        rng: &'a dyn RandomSource,
        metrics: &'a dyn MetricsPort,
    ) -> Self {
        Self {
            assaults,
            toggles,
            names,
            toggle_prefix,
            rng,
            metrics,
        }
    }

    /// Roll for the watched call and pick an assault if the roll fires
    ///
    /// Returns a pass when the roll misses, and also when it fires but no
    /// assault is eligible; in the latter case the anomaly is logged and
    /// counted, since an operator raised the level expecting effects.
    #[must_use]
    pub fn decide(
        &self,
        ctx: &RequestContext,
        executors: &[Arc<dyn AssaultExecutor>],
    ) -> Decision {
        let probability = self.assaults.level.probability();
        let roll = self.rng.roll();
        if roll >= probability {
            trace!(site = %ctx.call_site(), roll, probability, "roll missed");
            return Decision::pass();
        }

        let candidates: Vec<&Arc<dyn AssaultExecutor>> = executors
            .iter()
            .filter(|executor| self.is_eligible(ctx, executor.as_ref()))
            .collect();

        if candidates.is_empty() {
            warn!(
                site = %ctx.call_site(),
                level = self.assaults.level.get(),
                "trigger rolled but no assault is eligible"
            );
            self.metrics
                .record_config_anomaly(ctx.call_site(), "fired draw found no eligible assault");
            return Decision::pass();
        }

        let chosen = candidates[self.rng.pick(candidates.len())];
        Decision::fire(chosen.kind())
    }

    fn is_eligible(&self, ctx: &RequestContext, executor: &dyn AssaultExecutor) -> bool {
        if !executor.is_active(self.assaults) {
            return false;
        }

        let kind = executor.kind();
        let toggle = self.names.assault_toggle(self.toggle_prefix, &kind);
        if !self.toggles.is_enabled(&toggle) {
            return false;
        }

        // Custom assaults hit only services named in the allow list
        if kind.is_custom() && !self.assaults.watches_custom_service(ctx.call_site()) {
            return false;
        }

        // Never pick the fatal assault while another assault runs on this call
        if kind.is_fatal() && ctx.assault_in_flight() {
            return false;
        }

        true
    }
}
