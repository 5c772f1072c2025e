//! # Command routing.
//!
//! Commands walk the stack top-down. Each live controller is offered the command;
//! the first one that handles it ends the walk. A `MODAL` or `EXCLUSIVE` controller
//! that does not handle the command ends the walk too, so nothing below it ever
//! sees commands meant for the foreground.
//!
//! ```text
//!  top ──► [Toast]         not handled, keeps bubbling
//!          [Confirm MODAL] not handled, boundary: dispatch returns false
//!          [Inventory]     never offered
//! ```
//!
//! Routing runs on the caller's thread over a snapshot of the stack; it does not
//! wait for queued operations.

use std::sync::Arc;

use crate::controllers::{Command, ControllerId, ControllerProxy};
use crate::core::Presenter;
use crate::events::{Event, EventKind};
use crate::sync::lock;

impl Presenter {
    /// Offers `command` to the stack, starting at the top.
    ///
    /// Returns `true` if some controller handled it.
    pub fn dispatch(&self, command: impl Into<Command>) -> bool {
        let command = command.into();
        let chain: Vec<Arc<ControllerProxy>> = lock(&self.stack).top_down().cloned().collect();
        self.route(chain, &command)
    }

    /// Offers `command` to the stack, starting at controller `from`.
    pub(crate) fn dispatch_from(&self, from: ControllerId, command: &Command) -> bool {
        let chain: Vec<Arc<ControllerProxy>> = lock(&self.stack)
            .top_down()
            .skip_while(|p| p.id() != from)
            .cloned()
            .collect();
        if chain.is_empty() {
            tracing::trace!(controller = %from, ?command, "command from a controller that left the stack");
            return false;
        }
        self.route(chain, command)
    }

    fn route(&self, chain: Vec<Arc<ControllerProxy>>, command: &Command) -> bool {
        for proxy in chain {
            if !proxy.is_live() {
                continue;
            }
            match proxy.handle_command(command) {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => {
                    self.report_callback(&proxy, &e);
                    self.unhandled(command, Some(proxy.as_ref()));
                    return false;
                }
            }
            if proxy.flags().blocks_commands() {
                self.unhandled(command, Some(proxy.as_ref()));
                return false;
            }
        }
        self.unhandled(command, None);
        false
    }

    fn unhandled(&self, command: &Command, boundary: Option<&ControllerProxy>) {
        let mut ev = Event::new(EventKind::CommandUnhandled).with_reason(format!("{command:?}"));
        if let Some(proxy) = boundary {
            ev = ev.for_proxy(proxy);
        }
        self.bus.publish(ev);
    }
}
