//! Assault executor ports
//!
//! Executors are the concrete disruptive effects. Request-scoped effects
//! implement [`AssaultExecutor`] and run when the selector fires for one
//! call; process-wide effects implement [`RuntimeAssault`] and strike on a
//! schedule. The engine composes registered executors explicitly at startup;
//! nothing is discovered implicitly.

use async_trait::async_trait;
use domain::AssaultKind;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::{request_context::RequestContext, settings::AssaultSettings};

/// Failures an executor can signal
#[derive(Debug, Error)]
pub enum AssaultError {
    /// The designed effect of the exception assault: an intentional failure
    /// the caller is meant to observe
    #[error("Chaos injected failure: {0}")]
    Injected(String),

    /// The executor could not do its work; the engine degrades the call to
    /// "no effect" instead of propagating this to the caller
    #[error("Assault aborted: {0}")]
    Aborted(String),
}

impl AssaultError {
    /// Whether this error is the intended effect rather than a malfunction
    #[must_use]
    pub const fn is_injected(&self) -> bool {
        matches!(self, Self::Injected(_))
    }
}

/// Request-scoped assault effect applied to one intercepted call
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AssaultExecutor: Send + Sync {
    /// The kind this executor implements; its identity in the candidate set
    fn kind(&self) -> AssaultKind;

    /// Whether the given settings activate this executor
    fn is_active(&self, settings: &AssaultSettings) -> bool;

    /// Apply the effect for the given call
    ///
    /// # Errors
    ///
    /// `AssaultError::Injected` carries the designed failure of the
    /// exception assault out to the caller. `AssaultError::Aborted` reports
    /// a malfunction; the engine logs it and lets the call proceed unharmed.
    async fn apply(
        &self,
        ctx: &RequestContext,
        settings: &AssaultSettings,
    ) -> Result<(), AssaultError>;
}

/// Process-wide assault struck on a schedule rather than per request
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RuntimeAssault: Send + Sync {
    /// Stable name used in logs and scheduler registration
    fn name(&self) -> &'static str;

    /// Whether the given settings activate this assault
    fn is_active(&self, settings: &AssaultSettings) -> bool;

    /// Cron expression scheduling this assault, if configured
    fn cron(&self, settings: &AssaultSettings) -> Option<String>;

    /// Strike once against the given settings snapshot
    async fn strike(&self, settings: &AssaultSettings);
}
