//! The chaos engine façade
//!
//! One long-lived value per process. Hosts intercept a call, build a
//! [`RequestContext`], and either drive the `decide`/`execute` pair
//! themselves or hand the whole exchange to [`ChaosEngine::intercept`].
//!
//! Settings live behind an atomic swap: a decision snapshots them once and
//! works against that snapshot to the end, so a concurrent reload never
//! mixes two configurations inside one decision. The master switch is a
//! separate atomic so `enable`/`disable` act immediately without a reload.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use domain::{CallSite, Decision};
use tracing::{debug, info, instrument, warn};

use crate::ports::{
    AssaultError, AssaultExecutor, DecisionReport, MetricsPort, NoopMetrics, Outcome, RandomSource,
};
use crate::request_context::RequestContext;
use crate::services::assault_selector::AssaultSelector;
use crate::services::watcher_gate::WatcherGate;
use crate::settings::ChaosSettings;
use crate::toggles::{SignatureToggleNames, ToggleNameStrategy, ToggleRegistry};

/// Entry point for hosts embedding controlled failure injection
pub struct ChaosEngine {
    settings: ArcSwap<ChaosSettings>,
    enabled: AtomicBool,
    toggles: Arc<ToggleRegistry>,
    names: Arc<dyn ToggleNameStrategy>,
    rng: Arc<dyn RandomSource>,
    metrics: Arc<dyn MetricsPort>,
    executors: Vec<Arc<dyn AssaultExecutor>>,
}

impl std::fmt::Debug for ChaosEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChaosEngine")
            .field("enabled", &self.is_enabled())
            .field("toggles", &self.toggles.len())
            .field("executors", &self.executors.len())
            .finish_non_exhaustive()
    }
}

impl ChaosEngine {
    /// Create an engine over validated settings and a randomness source
    ///
    /// Starts with no executors, signature-keyed toggle names, and metrics
    /// discarded; attach collaborators with the `with_*` builders.
    #[must_use]
    pub fn new(settings: ChaosSettings, rng: Arc<dyn RandomSource>) -> Self {
        let enabled = settings.enabled();
        Self {
            settings: ArcSwap::from_pointee(settings),
            enabled: AtomicBool::new(enabled),
            toggles: Arc::new(ToggleRegistry::new()),
            names: Arc::new(SignatureToggleNames),
            rng,
            metrics: Arc::new(NoopMetrics),
            executors: Vec::new(),
        }
    }

    /// Attach a metrics collaborator
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsPort>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replace the toggle-name strategy
    #[must_use]
    pub fn with_toggle_names(mut self, names: Arc<dyn ToggleNameStrategy>) -> Self {
        self.names = names;
        self
    }

    /// Register an assault executor
    ///
    /// Registration order is irrelevant; selection among eligible executors
    /// is uniform.
    #[must_use]
    pub fn with_executor(mut self, executor: Arc<dyn AssaultExecutor>) -> Self {
        self.executors.push(executor);
        self
    }

    /// Whether the master switch is on
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Turn the engine on without touching settings
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Release);
        info!("chaos engine enabled");
    }

    /// Turn the engine off; in-flight assaults run to completion
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
        info!("chaos engine disabled");
    }

    /// Current settings snapshot
    #[must_use]
    pub fn settings(&self) -> Arc<ChaosSettings> {
        self.settings.load_full()
    }

    /// The shared toggle registry, for administrative surfaces
    #[must_use]
    pub fn toggles(&self) -> Arc<ToggleRegistry> {
        Arc::clone(&self.toggles)
    }

    /// Swap in a new settings snapshot
    ///
    /// Decisions in flight finish against the snapshot they started with;
    /// later decisions see the new one. The master switch is re-seeded from
    /// the incoming value, so a reload can enable or disable the engine.
    pub fn reload(&self, settings: ChaosSettings) {
        let enabled = settings.enabled();
        info!(
            enabled,
            level = settings.assaults().level.get(),
            "reloading chaos settings"
        );
        self.settings.store(Arc::new(settings));
        self.enabled.store(enabled, Ordering::Release);
    }

    /// Whether `site` is currently in scope, with no side effects
    ///
    /// Hosts use this to skip context assembly on the hot path. `false`
    /// whenever the engine is disabled.
    #[must_use]
    pub fn should_watch(&self, site: &CallSite) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let settings = self.settings.load();
        WatcherGate::new(
            settings.watcher(),
            &self.toggles,
            self.names.as_ref(),
            settings.toggle_prefix(),
        )
        .evaluate(site)
        .is_watched()
    }

    /// Decide what happens to the intercepted call
    ///
    /// Pure with respect to the call: nothing is executed here. A context
    /// whose process was already marked killed short-circuits out of scope.
    #[must_use]
    #[instrument(skip(self, ctx), fields(site = %ctx.call_site()))]
    pub fn decide(&self, ctx: &RequestContext) -> Decision {
        if ctx.is_killed() || !self.is_enabled() {
            return Decision::not_watched();
        }

        let settings = self.settings.load();
        let gate = WatcherGate::new(
            settings.watcher(),
            &self.toggles,
            self.names.as_ref(),
            settings.toggle_prefix(),
        );
        if let Some(early) = gate.evaluate(ctx.call_site()).early_decision() {
            return early;
        }

        let selector = AssaultSelector::new(
            settings.assaults(),
            &self.toggles,
            self.names.as_ref(),
            settings.toggle_prefix(),
            self.rng.as_ref(),
            self.metrics.as_ref(),
        );
        let decision = selector.decide(ctx, &self.executors);
        if let Some(kind) = decision.assault() {
            debug!(assault = %kind, "assault fired");
        }
        decision
    }

    /// Carry out a fired decision against the call
    ///
    /// Decisions that fired nothing map straight to their outcome. A fired
    /// decision runs its executor with the assault-in-flight flag held.
    ///
    /// # Errors
    ///
    /// Returns [`AssaultError::Injected`] when the exception assault raises
    /// its configured failure; that error is the assault's effect and must
    /// surface to the caller of the intercepted call. Executor malfunctions
    /// are absorbed into [`Outcome::Failed`].
    #[instrument(skip(self, ctx, decision), fields(site = %ctx.call_site()))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        decision: &Decision,
    ) -> Result<Outcome, AssaultError> {
        let Some(kind) = decision.assault() else {
            return Ok(if decision.is_watched() {
                Outcome::Passed
            } else {
                Outcome::NotWatched
            });
        };

        let Some(executor) = self.executors.iter().find(|e| e.kind() == *kind) else {
            warn!(assault = %kind, "fired decision has no registered executor");
            self.metrics
                .record_config_anomaly(ctx.call_site(), "fired decision has no executor");
            return Ok(Outcome::Failed);
        };

        let settings = self.settings.load();
        let result = {
            let _guard = ctx.begin_assault();
            executor.apply(ctx, settings.assaults()).await
        };

        match result {
            Ok(()) => {
                let outcome = if kind.is_fatal() {
                    Outcome::Terminated
                } else {
                    Outcome::Applied
                };
                debug!(assault = %kind, outcome = %outcome, "assault applied");
                Ok(outcome)
            }
            Err(err @ AssaultError::Injected(_)) => Err(err),
            Err(AssaultError::Aborted(reason)) => {
                warn!(assault = %kind, %reason, "assault aborted; call proceeds unharmed");
                Ok(Outcome::Failed)
            }
        }
    }

    /// Decide, execute, and report in one exchange
    ///
    /// The decision lands on the context, the terminal outcome goes to the
    /// metrics collaborator, and the injected error, if any, propagates.
    ///
    /// # Errors
    ///
    /// Propagates [`AssaultError::Injected`] exactly as [`Self::execute`]
    /// does, after the outcome has been reported.
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id(), site = %ctx.call_site()))]
    pub async fn intercept(&self, ctx: &RequestContext) -> Result<Outcome, AssaultError> {
        let decision = self.decide(ctx);
        ctx.record_decision(decision.clone());

        let result = self.execute(ctx, &decision).await;
        let outcome = match &result {
            Ok(outcome) => *outcome,
            Err(_) => Outcome::ErrorRaised,
        };
        self.metrics
            .record_decision(&DecisionReport::new(ctx, decision, outcome));
        result
    }
}
