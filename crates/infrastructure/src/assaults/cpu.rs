//! CPU runtime assault
//!
//! Drives load toward the configured target on every available core for the
//! configured duration. Each worker thread burns in 100ms duty-cycle slices:
//! busy for `slice * load_target`, asleep for the remainder.

use std::time::{Duration, Instant};

use application::{AssaultSettings, RuntimeAssault};
use async_trait::async_trait;
use tracing::{info, warn};

const SLICE: Duration = Duration::from_millis(100);

/// Burns CPU on a schedule
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuAssault;

impl CpuAssault {
    /// Create the assault
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RuntimeAssault for CpuAssault {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn is_active(&self, settings: &AssaultSettings) -> bool {
        settings.cpu.active
    }

    fn cron(&self, settings: &AssaultSettings) -> Option<String> {
        settings.cpu.cron.clone()
    }

    async fn strike(&self, settings: &AssaultSettings) {
        let load = settings.cpu.load_target;
        let fraction = if load.is_finite() { load.clamp(0.0, 1.0) } else { 0.0 };
        let hold = Duration::from_millis(settings.cpu.hold_load_ms);
        let cores = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);

        info!(
            cores,
            load_target = fraction,
            hold_ms = settings.cpu.hold_load_ms,
            "CPU assault burning"
        );

        if let Err(err) = tokio::task::spawn_blocking(move || burn(cores, fraction, hold)).await {
            warn!(error = %err, "CPU assault worker failed");
        }

        info!("CPU assault finished");
    }
}

/// Duty-cycle burn across `cores` threads until the deadline passes
fn burn(cores: usize, fraction: f64, hold: Duration) {
    let deadline = Instant::now() + hold;
    let busy = SLICE.mul_f64(fraction);
    let idle = SLICE.saturating_sub(busy);

    let workers: Vec<_> = (0..cores)
        .map(|_| {
            std::thread::spawn(move || {
                while Instant::now() < deadline {
                    let slice_end = Instant::now() + busy;
                    while Instant::now() < slice_end {
                        std::hint::spin_loop();
                    }
                    if !idle.is_zero() {
                        std::thread::sleep(idle.min(deadline.saturating_duration_since(Instant::now())));
                    }
                }
            })
        })
        .collect();

    for worker in workers {
        if worker.join().is_err() {
            warn!("CPU burn thread panicked");
        }
    }
}
