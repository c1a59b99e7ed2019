//! Request context threaded through every chaos decision
//!
//! This module provides the `RequestContext` that the interception hook
//! creates once per gated call and passes into the engine. It carries the
//! call-site identity, the in-flight flag behind the kill re-entrancy rule,
//! the terminal "killed" marker, and the final decision for reporting. State
//! lives in atomics so a context can be shared by reference across tasks
//! without locking.
//!
//! # Examples
//!
//! ```
//! use application::RequestContext;
//! use domain::{CallSite, Layer};
//!
//! let site = CallSite::new(Layer::Controller, "com.example.api", "HelloController", "hello");
//! let ctx = RequestContext::new(site);
//!
//! assert!(!ctx.request_id().is_nil());
//! assert!(!ctx.assault_in_flight());
//! assert!(!ctx.is_killed());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use domain::{CallSite, Decision};
use parking_lot::RwLock;
use uuid::Uuid;

/// Per-call scratch state for one intercepted invocation
///
/// Created by the interception hook, read and updated by the engine:
///
/// - `call_site`: where the intercepted call lives
/// - `request_id`: unique identifier for tracing and log correlation
/// - `assault_in_flight`: set while an executor runs, so the selector never
///   compounds a kill onto an already-assaulted request
/// - `killed`: latched once the kill assault applies; no further decisions
///   fire for this context
/// - `decision`: the final verdict, exposed read-only for reporting
#[derive(Debug)]
pub struct RequestContext {
    call_site: CallSite,
    request_id: Uuid,
    timestamp: DateTime<Utc>,
    assault_in_flight: AtomicBool,
    killed: AtomicBool,
    decision: RwLock<Option<Decision>>,
}

impl RequestContext {
    /// Create a context for the given call site
    ///
    /// Generates a new random request ID and captures the current timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use application::RequestContext;
    /// use domain::{CallSite, Layer};
    ///
    /// let site = CallSite::new(Layer::Service, "app.billing", "InvoiceService", "total");
    /// let ctx = RequestContext::new(site);
    /// assert_eq!(ctx.call_site().method_name(), "total");
    /// ```
    #[must_use]
    pub fn new(call_site: CallSite) -> Self {
        Self {
            call_site,
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            assault_in_flight: AtomicBool::new(false),
            killed: AtomicBool::new(false),
            decision: RwLock::new(None),
        }
    }

    /// Create a context with a request ID supplied by the host
    ///
    /// Useful when the surrounding request already carries a correlation ID.
    #[must_use]
    pub fn with_request_id(call_site: CallSite, request_id: Uuid) -> Self {
        Self {
            call_site,
            request_id,
            timestamp: Utc::now(),
            assault_in_flight: AtomicBool::new(false),
            killed: AtomicBool::new(false),
            decision: RwLock::new(None),
        }
    }

    /// The intercepted call's identity
    #[must_use]
    pub const fn call_site(&self) -> &CallSite {
        &self.call_site
    }

    /// The unique request identifier
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// When the context was created
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Whether an assault is currently executing for this request
    #[must_use]
    pub fn assault_in_flight(&self) -> bool {
        self.assault_in_flight.load(Ordering::Acquire)
    }

    /// Mark an assault as executing until the returned guard drops
    #[must_use]
    pub fn begin_assault(&self) -> AssaultGuard<'_> {
        self.assault_in_flight.store(true, Ordering::Release);
        AssaultGuard { ctx: self }
    }

    /// Latch the terminal marker after the kill assault applies
    pub fn mark_killed(&self) {
        self.killed.store(true, Ordering::Release);
    }

    /// Whether the kill assault already applied for this context
    #[must_use]
    pub fn is_killed(&self) -> bool {
        self.killed.load(Ordering::Acquire)
    }

    /// Record the final decision for this call
    pub fn record_decision(&self, decision: Decision) {
        *self.decision.write() = Some(decision);
    }

    /// The recorded decision, if the engine has produced one
    #[must_use]
    pub fn decision(&self) -> Option<Decision> {
        self.decision.read().clone()
    }
}

/// Clears the in-flight flag when the executor finishes, however it finishes
#[derive(Debug)]
#[must_use]
pub struct AssaultGuard<'a> {
    ctx: &'a RequestContext,
}

impl Drop for AssaultGuard<'_> {
    fn drop(&mut self) {
        self.ctx.assault_in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Layer;

    fn site() -> CallSite {
        CallSite::new(Layer::Controller, "x.y", "HelloController", "hello")
    }

    #[test]
    fn new_creates_unique_request_id() {
        let ctx1 = RequestContext::new(site());
        let ctx2 = RequestContext::new(site());

        assert_ne!(ctx1.request_id(), ctx2.request_id());
    }

    #[test]
    fn new_captures_current_timestamp() {
        let before = Utc::now();
        let ctx = RequestContext::new(site());
        let after = Utc::now();

        assert!(ctx.timestamp() >= before);
        assert!(ctx.timestamp() <= after);
    }

    #[test]
    fn with_request_id_uses_provided_id() {
        let request_id = Uuid::new_v4();
        let ctx = RequestContext::with_request_id(site(), request_id);

        assert_eq!(ctx.request_id(), request_id);
    }

    #[test]
    fn guard_sets_and_clears_in_flight_flag() {
        let ctx = RequestContext::new(site());
        assert!(!ctx.assault_in_flight());

        {
            let _guard = ctx.begin_assault();
            assert!(ctx.assault_in_flight());
        }

        assert!(!ctx.assault_in_flight());
    }

    #[test]
    fn killed_marker_latches() {
        let ctx = RequestContext::new(site());
        assert!(!ctx.is_killed());

        ctx.mark_killed();
        assert!(ctx.is_killed());

        // A second mark is harmless
        ctx.mark_killed();
        assert!(ctx.is_killed());
    }

    #[test]
    fn decision_starts_empty_and_records_last_write() {
        let ctx = RequestContext::new(site());
        assert!(ctx.decision().is_none());

        ctx.record_decision(Decision::pass());
        assert_eq!(ctx.decision(), Some(Decision::pass()));

        ctx.record_decision(Decision::not_watched());
        assert_eq!(ctx.decision(), Some(Decision::not_watched()));
    }

    #[test]
    fn context_is_shareable_across_threads() {
        let ctx = std::sync::Arc::new(RequestContext::new(site()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ctx = std::sync::Arc::clone(&ctx);
                std::thread::spawn(move || {
                    let _guard = ctx.begin_assault();
                    ctx.record_decision(Decision::pass());
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("thread panicked");
        }

        assert!(!ctx.assault_in_flight());
        assert_eq!(ctx.decision(), Some(Decision::pass()));
    }

    #[test]
    fn debug_format_contains_fields() {
        let ctx = RequestContext::new(site());
        let debug = format!("{ctx:?}");

        assert!(debug.contains("RequestContext"));
        assert!(debug.contains("call_site"));
        assert!(debug.contains("request_id"));
    }
}
