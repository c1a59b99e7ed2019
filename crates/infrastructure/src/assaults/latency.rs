//! Latency assault
//!
//! Suspends the intercepted call for a duration drawn uniformly from the
//! configured range. The sleep is async; no thread or lock is held while the
//! call waits.

use std::{sync::Arc, time::Duration};

use application::{AssaultError, AssaultExecutor, AssaultSettings, RandomSource, RequestContext};
use async_trait::async_trait;
use domain::AssaultKind;
use tracing::debug;

/// Delays the intercepted call by a random duration
pub struct LatencyAssault {
    rng: Arc<dyn RandomSource>,
}

impl std::fmt::Debug for LatencyAssault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatencyAssault").finish_non_exhaustive()
    }
}

impl LatencyAssault {
    /// Create the assault with the given randomness source
    #[must_use]
    pub fn new(rng: Arc<dyn RandomSource>) -> Self {
        Self { rng }
    }
}

#[async_trait]
impl AssaultExecutor for LatencyAssault {
    fn kind(&self) -> AssaultKind {
        AssaultKind::Latency
    }

    fn is_active(&self, settings: &AssaultSettings) -> bool {
        settings.latency_active
    }

    async fn apply(
        &self,
        ctx: &RequestContext,
        settings: &AssaultSettings,
    ) -> Result<(), AssaultError> {
        let delay_ms = self.rng.delay_ms(settings.latency_range);
        debug!(
            request_id = %ctx.request_id(),
            delay_ms,
            "Injecting latency"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        Ok(())
    }
}
