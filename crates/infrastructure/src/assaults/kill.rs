//! Kill assault
//!
//! Terminates the process, either for one intercepted call (request-scoped
//! executor) or on a schedule (runtime assault). Termination goes through
//! the injected [`ProcessTerminator`] so tests can substitute a recorder;
//! the shipped implementation exits the process and never returns.

use std::sync::Arc;

use application::{
    AssaultError, AssaultExecutor, AssaultSettings, RequestContext, RuntimeAssault,
};
use async_trait::async_trait;
use domain::AssaultKind;
#[cfg(test)]
use mockall::automock;
use tracing::error;

/// Ends the process with an exit code
#[cfg_attr(test, automock)]
pub trait ProcessTerminator: Send + Sync {
    /// Terminate the process; the shipped implementation does not return
    fn terminate(&self, exit_code: i32);
}

/// [`ProcessTerminator`] that exits the current process
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExit;

impl ProcessTerminator for SystemExit {
    fn terminate(&self, exit_code: i32) {
        std::process::exit(exit_code);
    }
}

/// Terminates the application when chosen
pub struct KillAssault {
    terminator: Arc<dyn ProcessTerminator>,
    exit_code: i32,
}

impl std::fmt::Debug for KillAssault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KillAssault")
            .field("exit_code", &self.exit_code)
            .finish_non_exhaustive()
    }
}

impl KillAssault {
    /// Create the assault with the given terminator, exiting with code 0
    #[must_use]
    pub fn new(terminator: Arc<dyn ProcessTerminator>) -> Self {
        Self {
            terminator,
            exit_code: 0,
        }
    }

    /// Override the exit code reported on termination
    #[must_use]
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }
}

#[async_trait]
impl AssaultExecutor for KillAssault {
    fn kind(&self) -> AssaultKind {
        AssaultKind::KillApplication
    }

    fn is_active(&self, settings: &AssaultSettings) -> bool {
        settings.kill_application_active
    }

    async fn apply(
        &self,
        ctx: &RequestContext,
        _settings: &AssaultSettings,
    ) -> Result<(), AssaultError> {
        error!(
            request_id = %ctx.request_id(),
            site = %ctx.call_site(),
            exit_code = self.exit_code,
            "Kill assault terminating the application"
        );
        ctx.mark_killed();
        self.terminator.terminate(self.exit_code);
        Ok(())
    }
}

#[async_trait]
impl RuntimeAssault for KillAssault {
    fn name(&self) -> &'static str {
        "kill_application"
    }

    fn is_active(&self, settings: &AssaultSettings) -> bool {
        settings.kill_application_active
    }

    fn cron(&self, settings: &AssaultSettings) -> Option<String> {
        settings.kill_application_cron.clone()
    }

    async fn strike(&self, _settings: &AssaultSettings) {
        error!(
            exit_code = self.exit_code,
            "Scheduled kill terminating the application"
        );
        self.terminator.terminate(self.exit_code);
    }
}

#[cfg(test)]
mod tests {
    use domain::{CallSite, Layer};
    use mockall::predicate::eq;

    use super::*;

    fn ctx() -> RequestContext {
        RequestContext::new(CallSite::new(Layer::Controller, "a.b", "Ctl", "get"))
    }

    #[test]
    fn implements_the_fatal_kill_kind() {
        let assault = KillAssault::new(Arc::new(MockProcessTerminator::new()));
        assert_eq!(
            AssaultExecutor::kind(&assault),
            AssaultKind::KillApplication
        );
        assert!(AssaultExecutor::kind(&assault).is_fatal());
    }

    #[test]
    fn activation_follows_the_kill_flag_on_both_traits() {
        let assault = KillAssault::new(Arc::new(MockProcessTerminator::new()));

        let mut settings = AssaultSettings::default();
        assert!(!AssaultExecutor::is_active(&assault, &settings));
        assert!(!RuntimeAssault::is_active(&assault, &settings));

        settings.kill_application_active = true;
        assert!(AssaultExecutor::is_active(&assault, &settings));
        assert!(RuntimeAssault::is_active(&assault, &settings));
    }

    #[tokio::test]
    async fn apply_marks_the_context_then_terminates() {
        let mut terminator = MockProcessTerminator::new();
        terminator
            .expect_terminate()
            .with(eq(0))
            .times(1)
            .return_const(());

        let assault = KillAssault::new(Arc::new(terminator));
        let ctx = ctx();
        assert!(!ctx.is_killed());

        assault
            .apply(&ctx, &AssaultSettings::default())
            .await
            .expect("recorded termination returns");

        assert!(ctx.is_killed());
    }

    #[tokio::test]
    async fn exit_code_override_reaches_the_terminator() {
        let mut terminator = MockProcessTerminator::new();
        terminator
            .expect_terminate()
            .with(eq(137))
            .times(1)
            .return_const(());

        let assault = KillAssault::new(Arc::new(terminator)).with_exit_code(137);

        assault
            .apply(&ctx(), &AssaultSettings::default())
            .await
            .expect("recorded termination returns");
    }

    #[tokio::test]
    async fn scheduled_strike_terminates_without_a_context() {
        let mut terminator = MockProcessTerminator::new();
        terminator
            .expect_terminate()
            .with(eq(0))
            .times(1)
            .return_const(());

        let assault = KillAssault::new(Arc::new(terminator));
        assault.strike(&AssaultSettings::default()).await;
    }

    #[test]
    fn scheduling_follows_the_kill_cron() {
        let assault = KillAssault::new(Arc::new(MockProcessTerminator::new()));

        let mut settings = AssaultSettings::default();
        assert_eq!(assault.cron(&settings), None);

        settings.kill_application_cron = Some("0 0 4 * * *".to_string());
        assert_eq!(assault.cron(&settings).as_deref(), Some("0 0 4 * * *"));
    }

    #[test]
    fn debug_hides_the_terminator() {
        let assault = KillAssault::new(Arc::new(MockProcessTerminator::new())).with_exit_code(1);
        let debug = format!("{assault:?}");
        assert!(debug.contains("KillAssault"));
        assert!(debug.contains("exit_code"));
    }
}
