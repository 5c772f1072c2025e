//! # Activation bookkeeping.
//!
//! At most one controller is `Active`: the top of the stack, unless the top was
//! pushed with `DO_NOT_ACTIVATE` and nothing has been pushed above it since.
//!
//! `on_activate` / `on_deactivate` failures are reported on the bus and never undo
//! the state change.

use std::sync::Arc;

use crate::controllers::{ControllerProxy, ControllerState, Hook};
use crate::core::Presenter;
use crate::error::PresentError;
use crate::events::{Event, EventKind};
use crate::sync::lock;

impl Presenter {
    /// The proxy currently in `Active` state.
    pub(super) fn active_proxy(&self) -> Option<Arc<ControllerProxy>> {
        lock(&self.stack)
            .top_down()
            .find(|p| p.state() == ControllerState::Active)
            .cloned()
    }

    pub(super) fn deactivate_top(&self) {
        if let Some(active) = self.active_proxy() {
            self.deactivate(&active);
        }
    }

    pub(super) fn deactivate(&self, proxy: &ControllerProxy) {
        if !proxy.transition(ControllerState::Inactive) {
            return;
        }
        if let Err(e) = proxy.invoke(Hook::Deactivate) {
            self.report_callback(proxy, &e);
        }
        self.bus
            .publish(Event::new(EventKind::ControllerDeactivated).for_proxy(proxy));
    }

    /// Activates the stack top unless it holds activation back.
    pub(super) fn activate_top(&self) {
        let (top, stale) = {
            let stack = lock(&self.stack);
            let Some(top) = stack.peek().cloned() else {
                return;
            };
            let stale: Vec<_> = stack
                .iter()
                .filter(|p| p.id() != top.id() && p.state() == ControllerState::Active)
                .cloned()
                .collect();
            (top, stale)
        };

        for proxy in &stale {
            self.deactivate(proxy);
        }
        if top.activation_held() || top.state() != ControllerState::Inactive {
            return;
        }
        if top.transition(ControllerState::Active) {
            if let Err(e) = top.invoke(Hook::Activate) {
                self.report_callback(&top, &e);
            }
            self.bus
                .publish(Event::new(EventKind::ControllerActivated).for_proxy(&top));
        }
    }

    /// Publishes a hook failure that does not fault anything by itself.
    pub(super) fn report_callback(&self, proxy: &ControllerProxy, error: &PresentError) {
        let (hook, reason) = match error {
            PresentError::Callback { hook, error, .. } => (*hook, error.clone()),
            other => ("unknown", other.as_message()),
        };
        tracing::debug!(controller = %proxy.id(), hook, %reason, "controller callback failed");
        self.bus.publish(
            Event::new(EventKind::CallbackFailed)
                .for_proxy(proxy)
                .with_hook(hook)
                .with_reason(reason),
        );
    }
}
