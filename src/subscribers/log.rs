//! # LogWriter: presenter events as `tracing` records.
//!
//! A subscriber that renders every [`Event`] through the `tracing` macros. Failures are
//! logged at `warn`, controller lifecycle at `debug`, queue traffic at `trace`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! DEBUG viewvisor: presented controller="Inventory" id=c3 op=op5
//!  WARN viewvisor: callback failed controller="Inventory" id=c3 hook="on_activate" reason="no focus"
//! DEBUG viewvisor: dismissed controller="Inventory" id=c3 op=op6
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let controller = e.controller.as_deref().unwrap_or("-");
        let id = e.controller_id.map(|id| id.to_string()).unwrap_or_default();
        let op = e.operation.map(|op| op.to_string()).unwrap_or_default();
        let op_kind = e.operation_kind.map(|k| k.as_str()).unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::OperationQueued => {
                tracing::trace!(seq = e.seq, op = %op, op_kind, controller, "queued");
            }
            EventKind::OperationStarted => {
                tracing::trace!(seq = e.seq, op = %op, op_kind, "started");
            }
            EventKind::OperationSucceeded => {
                tracing::trace!(seq = e.seq, op = %op, op_kind, controller, "succeeded");
            }
            EventKind::OperationCanceled => {
                tracing::debug!(seq = e.seq, op = %op, op_kind, "canceled");
            }
            EventKind::OperationFaulted => {
                tracing::warn!(seq = e.seq, op = %op, op_kind, reason, "faulted");
            }
            EventKind::ControllerPresented => {
                tracing::debug!(seq = e.seq, controller, id = %id, op = %op, "presented");
            }
            EventKind::ControllerActivated => {
                tracing::debug!(seq = e.seq, controller, id = %id, "activated");
            }
            EventKind::ControllerDeactivated => {
                tracing::debug!(seq = e.seq, controller, id = %id, "deactivated");
            }
            EventKind::ControllerDismissed => {
                tracing::debug!(seq = e.seq, controller, id = %id, op = %op, "dismissed");
            }
            EventKind::ControllerDisposed => {
                tracing::trace!(seq = e.seq, controller, id = %id, "disposed");
            }
            EventKind::CallbackFailed => {
                let hook = e.hook.unwrap_or("-");
                tracing::warn!(seq = e.seq, controller, id = %id, hook, reason, "callback failed");
            }
            EventKind::ViewReleaseFailed => {
                tracing::warn!(seq = e.seq, controller, id = %id, reason, "view release failed");
            }
            EventKind::CommandUnhandled => {
                tracing::debug!(seq = e.seq, command = reason, boundary = controller, "command unhandled");
            }
            EventKind::ShutdownRequested => {
                tracing::info!(seq = e.seq, "shutdown requested");
            }
            EventKind::SubscriberOverflow => {
                let subscriber = e.source.unwrap_or("unknown");
                tracing::warn!(seq = e.seq, subscriber, reason, "subscriber dropped event");
            }
            EventKind::SubscriberPanicked => {
                let subscriber = e.source.unwrap_or("unknown");
                tracing::error!(seq = e.seq, subscriber, reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
