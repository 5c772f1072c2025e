//! # Runtime events emitted by the presenter.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Operation events**: queue flow of present/dismiss operations
//! - **Controller events**: lifecycle steps of a single controller
//! - **Failure reports**: errors that are reported but never thrown (hooks, view release)
//! - **Runtime events**: shutdown and subscriber health
//!
//! The [`Event`] struct carries the metadata: timestamps, controller type and id,
//! operation id and kind, failing hook, reasons.
//!
//! ## Ordering guarantees
//! Each event gets a sequence number from the [`Bus`](crate::Bus) that publishes it.
//! Numbers increase monotonically per bus; use `seq` to restore order across subscribers.
//!
//! ## Example
//! ```rust
//! use viewvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::CallbackFailed)
//!     .with_controller("Inventory")
//!     .with_hook("on_activate")
//!     .with_reason("no focus");
//!
//! assert_eq!(ev.kind, EventKind::CallbackFailed);
//! assert_eq!(ev.controller.as_deref(), Some("Inventory"));
//! assert_eq!(ev.hook, Some("on_activate"));
//! ```

use std::sync::Arc;
use std::time::SystemTime;

use crate::controllers::{ControllerId, ControllerProxy};
use crate::operations::{OperationId, OperationKind};

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Operation events ===
    /// Operation accepted into the queue.
    ///
    /// Sets:
    /// - `operation`, `operation_kind`
    /// - `controller`: requested type (present only)
    OperationQueued,

    /// Operation loop picked the operation up.
    ///
    /// Sets:
    /// - `operation`, `operation_kind`
    OperationStarted,

    /// Operation completed without errors.
    ///
    /// Sets:
    /// - `operation`, `operation_kind`
    /// - `controller`, `controller_id`: presented controller (present only)
    OperationSucceeded,

    /// Operation completed with at least one error.
    ///
    /// Sets:
    /// - `operation`, `operation_kind`
    /// - `reason`: first error message
    OperationFaulted,

    /// Operation canceled before it started (or aborted by shutdown).
    ///
    /// Sets:
    /// - `operation`, `operation_kind`
    OperationCanceled,

    // === Controller lifecycle ===
    /// Controller pushed and `on_present` returned.
    ///
    /// Sets:
    /// - `controller`, `controller_id`, `operation`
    ControllerPresented,

    /// Controller became the effective top.
    ///
    /// Sets:
    /// - `controller`, `controller_id`
    ControllerActivated,

    /// Controller stopped being the effective top.
    ///
    /// Sets:
    /// - `controller`, `controller_id`
    ControllerDeactivated,

    /// Controller left the stack.
    ///
    /// Sets:
    /// - `controller`, `controller_id`, `operation`
    ControllerDismissed,

    /// Controller and view dropped.
    ///
    /// Sets:
    /// - `controller`, `controller_id`
    ControllerDisposed,

    // === Failure reports ===
    /// A controller hook returned an error or panicked.
    ///
    /// Sets:
    /// - `controller`, `controller_id`
    /// - `hook`: hook name (`on_activate`, `handle_command`, ...)
    /// - `reason`: error message
    CallbackFailed,

    /// `ViewFactory::release_view` failed or panicked.
    ///
    /// Sets:
    /// - `controller`, `controller_id`
    /// - `reason`: error message
    ViewReleaseFailed,

    /// A dispatched command was not handled by anyone.
    ///
    /// Sets:
    /// - `reason`: command description
    /// - `controller`, `controller_id`: boundary that stopped routing, if any
    CommandUnhandled,

    // === Runtime events ===
    /// Presenter shutdown requested.
    ShutdownRequested,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `source`: subscriber name
    /// - `reason`: `"full"` or `"closed"`
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `source`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: per-bus sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Sequence number assigned by the publishing bus.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Short controller type name.
    pub controller: Option<Arc<str>>,
    /// Controller instance id.
    pub controller_id: Option<ControllerId>,
    /// Operation id.
    pub operation: Option<OperationId>,
    /// Operation kind.
    pub operation_kind: Option<OperationKind>,
    /// Failing hook name.
    pub hook: Option<&'static str>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Emitting component, for subscriber events.
    pub source: Option<&'static str>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: 0,
            at: SystemTime::now(),
            kind,
            controller: None,
            controller_id: None,
            operation: None,
            operation_kind: None,
            hook: None,
            reason: None,
            source: None,
        }
    }

    /// Attaches a controller type name.
    #[inline]
    pub fn with_controller(mut self, name: impl Into<Arc<str>>) -> Self {
        self.controller = Some(name.into());
        self
    }

    #[inline]
    pub fn with_controller_id(mut self, id: ControllerId) -> Self {
        self.controller_id = Some(id);
        self
    }

    /// Attaches an operation id and kind.
    #[inline]
    pub fn with_operation(mut self, id: OperationId, kind: OperationKind) -> Self {
        self.operation = Some(id);
        self.operation_kind = Some(kind);
        self
    }

    #[inline]
    pub fn with_hook(mut self, hook: &'static str) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[inline]
    pub fn with_source(mut self, source: &'static str) -> Self {
        self.source = Some(source);
        self
    }

    /// Attaches the type name and id of a proxy.
    #[inline]
    pub(crate) fn for_proxy(self, proxy: &ControllerProxy) -> Self {
        self.with_controller(proxy.name()).with_controller_id(proxy.id())
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_source(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_source(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }

    /// `true` for events that report a problem.
    pub fn is_failure(&self) -> bool {
        matches!(
            self.kind,
            EventKind::OperationFaulted
                | EventKind::CallbackFailed
                | EventKind::ViewReleaseFailed
                | EventKind::SubscriberOverflow
                | EventKind::SubscriberPanicked
        )
    }
}
