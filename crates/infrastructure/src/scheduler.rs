//! Cron scheduling for runtime assaults
//!
//! Registers each runtime assault under its configured cron expression and
//! re-checks the master switch and the assault's activation against the
//! current settings snapshot at every tick, so a reload or a runtime disable
//! takes effect without re-registration.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use application::{ChaosEngine, RuntimeAssault};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, info, warn};

/// Scheduler lifecycle and registration errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A cron expression failed to parse
    #[error("Invalid cron expression '{expr}': {reason}")]
    InvalidCron { expr: String, reason: String },

    /// The underlying job scheduler failed
    #[error("Scheduler error: {0}")]
    Internal(String),
}

impl From<JobSchedulerError> for SchedulerError {
    fn from(err: JobSchedulerError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Drives scheduled runtime assaults against the engine's current settings
pub struct AssaultScheduler {
    engine: Arc<ChaosEngine>,
    scheduler: Mutex<JobScheduler>,
    running: AtomicBool,
}

impl std::fmt::Debug for AssaultScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssaultScheduler")
            .field("running", &self.running.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl AssaultScheduler {
    /// Create a scheduler bound to the given engine
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Internal` when the underlying job scheduler
    /// cannot be created.
    pub async fn new(engine: Arc<ChaosEngine>) -> Result<Self, SchedulerError> {
        let scheduler = JobScheduler::new().await?;
        Ok(Self {
            engine,
            scheduler: Mutex::new(scheduler),
            running: AtomicBool::new(false),
        })
    }

    /// Register one runtime assault under its configured cron expression
    ///
    /// Returns `Ok(false)` when the current settings carry no cron for this
    /// assault. The job body re-reads the settings snapshot at every tick;
    /// only the expression itself is fixed at registration.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidCron` for an unparseable expression
    /// and `SchedulerError::Internal` when registration fails.
    pub async fn schedule(&self, assault: Arc<dyn RuntimeAssault>) -> Result<bool, SchedulerError> {
        let settings = self.engine.settings();
        let Some(expr) = assault.cron(settings.assaults()) else {
            debug!(assault = assault.name(), "No cron configured; not scheduling");
            return Ok(false);
        };

        expr.parse::<cron::Schedule>()
            .map_err(|e| SchedulerError::InvalidCron {
                expr: expr.clone(),
                reason: e.to_string(),
            })?;

        let engine = Arc::clone(&self.engine);
        let job_assault = Arc::clone(&assault);
        let job = Job::new_async(expr.as_str(), move |_uuid, _lock| {
            let engine = Arc::clone(&engine);
            let assault = Arc::clone(&job_assault);
            Box::pin(async move {
                if !engine.is_enabled() {
                    debug!(assault = assault.name(), "Skipping strike; chaos disabled");
                    return;
                }
                let settings = engine.settings();
                if !assault.is_active(settings.assaults()) {
                    debug!(assault = assault.name(), "Skipping strike; assault inactive");
                    return;
                }
                info!(assault = assault.name(), "Striking scheduled assault");
                assault.strike(settings.assaults()).await;
            })
        })?;

        self.scheduler.lock().await.add(job).await?;
        info!(
            assault = assault.name(),
            cron = %expr,
            "Scheduled runtime assault"
        );
        Ok(true)
    }

    /// Register every assault that carries a cron expression
    ///
    /// # Errors
    ///
    /// Propagates the first registration failure.
    pub async fn schedule_all(
        &self,
        assaults: &[Arc<dyn RuntimeAssault>],
    ) -> Result<usize, SchedulerError> {
        let mut scheduled = 0;
        for assault in assaults {
            if self.schedule(Arc::clone(assault)).await? {
                scheduled += 1;
            }
        }
        Ok(scheduled)
    }

    /// Start ticking; repeated calls are no-ops
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Internal` when the underlying scheduler
    /// fails to start.
    pub async fn start(&self) -> Result<(), SchedulerError> {
        if self.running.swap(true, Ordering::AcqRel) {
            warn!("Assault scheduler already running");
            return Ok(());
        }
        self.scheduler.lock().await.start().await?;
        info!("Assault scheduler started");
        Ok(())
    }

    /// Stop ticking; repeated calls are no-ops
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Internal` when the underlying scheduler
    /// fails to shut down.
    pub async fn shutdown(&self) -> Result<(), SchedulerError> {
        if !self.running.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        self.scheduler.lock().await.shutdown().await?;
        info!("Assault scheduler stopped");
        Ok(())
    }

    /// Whether the scheduler is currently ticking
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
