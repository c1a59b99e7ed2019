//! Memory runtime assault
//!
//! Gradually fills memory up to the configured target, holds the filled
//! buffers, then releases them. Buffers are written, not merely reserved, so
//! the pressure is visible to the operating system.

use application::{AssaultSettings, RuntimeAssault};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

const FILL_PATTERN: u8 = 0xA5;

/// Fills and holds memory on a schedule
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryAssault;

impl MemoryAssault {
    /// Create the assault
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RuntimeAssault for MemoryAssault {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn is_active(&self, settings: &AssaultSettings) -> bool {
        settings.memory.active
    }

    fn cron(&self, settings: &AssaultSettings) -> Option<String> {
        settings.memory.cron.clone()
    }

    async fn strike(&self, settings: &AssaultSettings) {
        let memory = &settings.memory;
        info!(
            target_bytes = memory.fill_target_bytes,
            increment_bytes = memory.fill_increment_bytes,
            "Memory assault filling"
        );

        let mut filled: Vec<Vec<u8>> = Vec::new();
        let mut remaining = memory.fill_target_bytes;
        while remaining > 0 {
            let step = memory.fill_increment_bytes.min(remaining);
            let len = usize::try_from(step).unwrap_or(usize::MAX);
            filled.push(vec![FILL_PATTERN; len]);
            remaining = remaining.saturating_sub(step);
            debug!(
                filled_bytes = memory.fill_target_bytes - remaining,
                "Memory assault step complete"
            );
            if remaining > 0 {
                tokio::time::sleep(Duration::from_millis(memory.wait_between_increases_ms)).await;
            }
        }

        info!(
            held_bytes = memory.fill_target_bytes,
            hold_ms = memory.hold_filled_ms,
            "Memory assault holding"
        );
        tokio::time::sleep(Duration::from_millis(memory.hold_filled_ms)).await;

        drop(filled);
        info!("Memory assault released");
    }
}

#[cfg(test)]
mod tests {
    use application::MemoryAssaultSettings;

    use super::*;

    fn settings(memory: MemoryAssaultSettings) -> AssaultSettings {
        AssaultSettings {
            memory,
            ..AssaultSettings::default()
        }
    }

    #[test]
    fn activation_and_schedule_follow_the_memory_section() {
        let assault = MemoryAssault::new();
        assert_eq!(assault.name(), "memory");

        let inactive = settings(MemoryAssaultSettings::default());
        assert!(!assault.is_active(&inactive));
        assert_eq!(assault.cron(&inactive), None);

        let active = settings(MemoryAssaultSettings {
            active: true,
            cron: Some("0 30 3 * * *".to_string()),
            ..MemoryAssaultSettings::default()
        });
        assert!(assault.is_active(&active));
        assert_eq!(assault.cron(&active).as_deref(), Some("0 30 3 * * *"));
    }

    #[tokio::test(start_paused = true)]
    async fn strike_paces_fill_steps_and_holds() {
        let assault = MemoryAssault::new();
        let settings = settings(MemoryAssaultSettings {
            active: true,
            fill_target_bytes: 64,
            fill_increment_bytes: 32,
            wait_between_increases_ms: 10,
            hold_filled_ms: 20,
            cron: None,
        });

        let before = tokio::time::Instant::now();
        assault.strike(&settings).await;

        // Two steps with one pause between them, then the hold
        assert_eq!(before.elapsed(), Duration::from_millis(30));
    }

    #[tokio::test(start_paused = true)]
    async fn uneven_target_fills_a_short_final_step() {
        let assault = MemoryAssault::new();
        let settings = settings(MemoryAssaultSettings {
            active: true,
            fill_target_bytes: 70,
            fill_increment_bytes: 32,
            wait_between_increases_ms: 5,
            hold_filled_ms: 0,
            cron: None,
        });

        let before = tokio::time::Instant::now();
        assault.strike(&settings).await;

        // Steps of 32, 32 and 6 bytes; two pauses between three steps
        assert_eq!(before.elapsed(), Duration::from_millis(10));
    }

    #[tokio::test]
    async fn zero_target_strikes_without_allocating() {
        let assault = MemoryAssault::new();
        let settings = settings(MemoryAssaultSettings {
            active: true,
            fill_target_bytes: 0,
            fill_increment_bytes: 32,
            wait_between_increases_ms: 1_000,
            hold_filled_ms: 0,
            cron: None,
        });

        assault.strike(&settings).await;
    }
}
