//! # Dismiss algorithm.
//!
//! ```text
//! dismiss(target)
//!   ├─► skip if target already dismissed or off the stack
//!   ├─► deactivate the active controller if it is target or one of its children
//!   ├─► children (most recently pushed first): on_dismiss → remove → dispose
//!   ├─► target: on_dismiss → remove → dispose
//!   └─► activate the new top
//! ```
//!
//! `on_dismiss` failures fault the operation but never stop the teardown. When the
//! teardown is a side effect of a present policy, failures are only reported.

use std::sync::Arc;

use crate::controllers::{ControllerProxy, ControllerState, Hook};
use crate::core::Presenter;
use crate::events::{Event, EventKind};
use crate::operations::OperationState;
use crate::sync::lock;

/// Where teardown errors go.
#[derive(Clone, Copy)]
pub(super) enum Blame<'a> {
    /// Recorded on the operation.
    Fault(&'a OperationState),
    /// Reported only, on behalf of this operation (if any).
    Report(Option<&'a OperationState>),
}

impl<'a> Blame<'a> {
    fn op(self) -> Option<&'a OperationState> {
        match self {
            Blame::Fault(op) => Some(op),
            Blame::Report(op) => op,
        }
    }
}

impl Presenter {
    pub(super) fn run_dismiss(&self, op: &OperationState, target: &Arc<ControllerProxy>) {
        self.dismiss_tree(target, Blame::Fault(op));
        self.activate_top();
    }

    pub(super) fn run_dismiss_all(&self, op: &OperationState) {
        self.dismiss_everything(Blame::Fault(op));
        self.activate_top();
    }

    /// Dismisses `target` and its `CHILD` descendants.
    pub(super) fn dismiss_tree(&self, target: &Arc<ControllerProxy>, blame: Blame<'_>) {
        let descendants = {
            let stack = lock(&self.stack);
            if target.is_dismissed() || !stack.contains(target.id()) {
                tracing::trace!(controller = %target.id(), "dismiss target already gone");
                return;
            }
            stack.descendants_of(target.id())
        };

        if let Some(active) = self.active_proxy() {
            let affected =
                active.id() == target.id() || descendants.iter().any(|d| d.id() == active.id());
            if affected {
                self.deactivate(&active);
            }
        }

        for child in &descendants {
            self.teardown(child, blame);
        }
        self.teardown(target, blame);
    }

    /// Dismisses the whole stack top to bottom without activating anything in between.
    pub(super) fn dismiss_everything(&self, blame: Blame<'_>) {
        self.deactivate_top();
        let all = lock(&self.stack).snapshot();
        for proxy in all.iter().rev() {
            self.teardown(proxy, blame);
        }
    }

    fn teardown(&self, proxy: &Arc<ControllerProxy>, blame: Blame<'_>) {
        if !proxy.transition(ControllerState::Dismissing) {
            return;
        }

        if let Err(e) = proxy.invoke(Hook::Dismiss) {
            self.report_callback(proxy, &e);
            if let Blame::Fault(op) = blame {
                op.push_error(e);
            }
        }

        lock(&self.stack).remove(proxy.id());
        let mut ev = Event::new(EventKind::ControllerDismissed).for_proxy(proxy);
        if let Some(op) = blame.op() {
            ev = ev.with_operation(op.id(), op.kind());
        }
        self.bus.publish(ev);

        self.dispose(proxy);
    }

    /// Drops the controller and releases its view; release failures are reported only.
    pub(super) fn dispose(&self, proxy: &ControllerProxy) {
        if proxy.state() == ControllerState::Disposed {
            return;
        }
        if let Err(e) = proxy.dispose(self.views.as_ref()) {
            self.bus.publish(
                Event::new(EventKind::ViewReleaseFailed)
                    .for_proxy(proxy)
                    .with_reason(e.to_string()),
            );
        }
        self.bus
            .publish(Event::new(EventKind::ControllerDisposed).for_proxy(proxy));
    }
}
