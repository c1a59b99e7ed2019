//! Exception assault
//!
//! Fails the intercepted call with an injected error. The message is drawn
//! from the configured list, or falls back to a fixed default when the list
//! is empty. The resulting `AssaultError::Injected` is the designed effect
//! and propagates to the caller; the engine does not treat it as a
//! malfunction.

use std::sync::Arc;

use application::{AssaultError, AssaultExecutor, AssaultSettings, RandomSource, RequestContext};
use async_trait::async_trait;
use domain::AssaultKind;
use tracing::debug;

/// Raises a configured failure from the intercepted call
pub struct ExceptionAssault {
    rng: Arc<dyn RandomSource>,
}

impl std::fmt::Debug for ExceptionAssault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExceptionAssault").finish_non_exhaustive()
    }
}

impl ExceptionAssault {
    /// Message used when no exception messages are configured
    pub const DEFAULT_MESSAGE: &'static str = "Simulated failure";

    /// Create the assault with the given randomness source
    #[must_use]
    pub fn new(rng: Arc<dyn RandomSource>) -> Self {
        Self { rng }
    }
}

#[async_trait]
impl AssaultExecutor for ExceptionAssault {
    fn kind(&self) -> AssaultKind {
        AssaultKind::Exception
    }

    fn is_active(&self, settings: &AssaultSettings) -> bool {
        settings.exceptions_active
    }

    async fn apply(
        &self,
        ctx: &RequestContext,
        settings: &AssaultSettings,
    ) -> Result<(), AssaultError> {
        let message = if settings.exceptions.is_empty() {
            Self::DEFAULT_MESSAGE.to_string()
        } else {
            settings.exceptions[self.rng.pick(settings.exceptions.len())].clone()
        };
        debug!(
            request_id = %ctx.request_id(),
            %message,
            "Raising injected failure"
        );
        Err(AssaultError::Injected(message))
    }
}

#[cfg(test)]
mod tests {
    use domain::{CallSite, LatencyRange, Layer};

    use super::*;

    struct PicksIndex {
        index: usize,
    }

    impl RandomSource for PicksIndex {
        fn roll(&self) -> f64 {
            0.0
        }

        fn pick(&self, bound: usize) -> usize {
            self.index.min(bound.saturating_sub(1))
        }

        fn delay_ms(&self, range: LatencyRange) -> u64 {
            range.start_ms()
        }
    }

    fn ctx() -> RequestContext {
        RequestContext::new(CallSite::new(Layer::Service, "a.b", "Svc", "run"))
    }

    #[test]
    fn implements_the_exception_kind() {
        let assault = ExceptionAssault::new(Arc::new(PicksIndex { index: 0 }));
        assert_eq!(assault.kind(), AssaultKind::Exception);
    }

    #[test]
    fn activation_follows_the_exceptions_flag() {
        let assault = ExceptionAssault::new(Arc::new(PicksIndex { index: 0 }));

        let mut settings = AssaultSettings::default();
        assert!(!assault.is_active(&settings));

        settings.exceptions_active = true;
        assert!(assault.is_active(&settings));
    }

    #[tokio::test]
    async fn empty_list_raises_the_default_message() {
        let assault = ExceptionAssault::new(Arc::new(PicksIndex { index: 0 }));

        let err = assault
            .apply(&ctx(), &AssaultSettings::default())
            .await
            .expect_err("exception always fails the call");

        assert!(err.is_injected());
        assert_eq!(
            err.to_string(),
            format!("Chaos injected failure: {}", ExceptionAssault::DEFAULT_MESSAGE)
        );
    }

    #[tokio::test]
    async fn configured_messages_are_drawn_by_index() {
        let assault = ExceptionAssault::new(Arc::new(PicksIndex { index: 1 }));
        let settings = AssaultSettings {
            exceptions: vec![
                "first failure".to_string(),
                "second failure".to_string(),
                "third failure".to_string(),
            ],
            ..AssaultSettings::default()
        };

        let err = assault
            .apply(&ctx(), &settings)
            .await
            .expect_err("exception always fails the call");

        assert_eq!(err.to_string(), "Chaos injected failure: second failure");
    }

    #[tokio::test]
    async fn single_message_needs_no_randomness() {
        let assault = ExceptionAssault::new(Arc::new(PicksIndex { index: 0 }));
        let settings = AssaultSettings {
            exceptions: vec!["only one".to_string()],
            ..AssaultSettings::default()
        };

        let err = assault
            .apply(&ctx(), &settings)
            .await
            .expect_err("exception always fails the call");

        assert_eq!(err.to_string(), "Chaos injected failure: only one");
    }
}
