//! # ControllerProxy: one node of the presentation stack.
//!
//! The proxy owns a controller instance, its view and its lifecycle state. It is the
//! only place that calls into controller code; every call is wrapped in
//! `catch_unwind` so a panicking controller surfaces as an error, never as an
//! unwinding presenter.
//!
//! ## Lifecycle
//! ```text
//! Constructing ──► Presenting ──► Inactive ◄──► Active
//!      │               │             │            │
//!      │               │             └──► Dismissing ◄┘
//!      │               │                     │
//!      └───────────────┴──────────────► Disposed
//! ```
//!
//! ## Rules
//! - `on_present` and `on_dismiss` fire at most once per proxy.
//! - Only `Inactive` and `Active` proxies are live: they receive commands and can be
//!   activated.
//! - The parent link is weak; lifetime flows from the stack only.
//! - Controller code never re-enters its own controller. A hook or handler that routes a
//!   command back to itself (or calls `ControllerRef::with` on itself) sees the
//!   controller as busy: the command is not handled and `with` returns `None`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::thread::{self, ThreadId};
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::controllers::controller::AnyController;
use crate::controllers::{Command, ControllerEvents, ControllerId, ControllerType, PresentArgs};
use crate::error::{ControllerError, PresentError, ViewError, panic_message};
use crate::policies::PresentFlags;
use crate::services::{ViewFactory, ViewRef};
use crate::sync::lock;

/// Lifecycle state of a presented controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControllerState {
    /// Controller instance is being built.
    Constructing,
    /// Waiting for the view.
    Presenting,
    /// On the stack, not the effective top.
    Inactive,
    /// On the stack and the effective top.
    Active,
    /// `on_dismiss` is running or about to run.
    Dismissing,
    /// Controller and view are gone.
    Disposed,
}

impl ControllerState {
    /// On the stack and able to receive commands.
    #[inline]
    pub fn is_live(self) -> bool {
        matches!(self, ControllerState::Inactive | ControllerState::Active)
    }

    #[inline]
    pub fn is_dismissed(self) -> bool {
        matches!(self, ControllerState::Dismissing | ControllerState::Disposed)
    }

    fn can_become(self, next: ControllerState) -> bool {
        use ControllerState::*;
        matches!(
            (self, next),
            (Constructing, Presenting)
                | (Constructing, Disposed)
                | (Presenting, Inactive)
                | (Presenting, Disposed)
                | (Inactive, Active)
                | (Active, Inactive)
                | (Inactive, Dismissing)
                | (Active, Dismissing)
                | (Dismissing, Disposed)
        )
    }
}

/// Controller hook selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Hook {
    Present,
    Activate,
    Deactivate,
    Dismiss,
}

impl Hook {
    pub fn as_str(self) -> &'static str {
        match self {
            Hook::Present => "on_present",
            Hook::Activate => "on_activate",
            Hook::Deactivate => "on_deactivate",
            Hook::Dismiss => "on_dismiss",
        }
    }

    fn call(self, events: &mut dyn ControllerEvents) -> Result<(), ControllerError> {
        match self {
            Hook::Present => events.on_present(),
            Hook::Activate => events.on_activate(),
            Hook::Deactivate => events.on_deactivate(),
            Hook::Dismiss => events.on_dismiss(),
        }
    }
}

type ControllerSlot = Option<Box<dyn AnyController>>;

/// Exclusive access to a proxy's controller, tagged with the owning thread.
struct SlotGuard<'a> {
    slot: MutexGuard<'a, ControllerSlot>,
    owner: &'a Mutex<Option<ThreadId>>,
}

impl Deref for SlotGuard<'_> {
    type Target = ControllerSlot;

    fn deref(&self) -> &ControllerSlot {
        &self.slot
    }
}

impl DerefMut for SlotGuard<'_> {
    fn deref_mut(&mut self) -> &mut ControllerSlot {
        &mut self.slot
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        *lock(self.owner) = None;
    }
}

struct Lifecycle {
    state: ControllerState,
    /// Set by `DO_NOT_ACTIVATE`; cleared once something is pushed above.
    hold_activation: bool,
}

/// Stack node wrapping one controller.
pub(crate) struct ControllerProxy {
    id: ControllerId,
    kind: ControllerType,
    flags: PresentFlags,
    args: PresentArgs,
    parent: Option<Weak<ControllerProxy>>,
    presented_at: Instant,

    lifecycle: Mutex<Lifecycle>,
    controller: Mutex<ControllerSlot>,
    /// Thread currently inside controller code.
    owner: Mutex<Option<ThreadId>>,
    view: Mutex<Option<ViewRef>>,
    result: Mutex<Option<Box<dyn Any + Send>>>,
    dismissed: CancellationToken,
}

impl ControllerProxy {
    /// Creates an empty proxy in `Constructing` state.
    pub fn new(
        id: ControllerId,
        kind: ControllerType,
        flags: PresentFlags,
        args: PresentArgs,
        parent: Option<&Arc<ControllerProxy>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            kind,
            flags,
            args,
            parent: parent.map(Arc::downgrade),
            presented_at: Instant::now(),
            lifecycle: Mutex::new(Lifecycle {
                state: ControllerState::Constructing,
                hold_activation: flags.contains(PresentFlags::DO_NOT_ACTIVATE),
            }),
            controller: Mutex::new(None),
            owner: Mutex::new(None),
            view: Mutex::new(None),
            result: Mutex::new(None),
            dismissed: CancellationToken::new(),
        })
    }

    #[inline]
    pub fn id(&self) -> ControllerId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> ControllerType {
        self.kind
    }

    /// Short controller type name, used in errors and events.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind.short_name()
    }

    #[inline]
    pub fn flags(&self) -> PresentFlags {
        self.flags
    }

    #[inline]
    pub fn args(&self) -> &PresentArgs {
        &self.args
    }

    #[inline]
    pub fn presented_at(&self) -> Instant {
        self.presented_at
    }

    /// Presenting controller, if it is still alive.
    pub fn parent(&self) -> Option<Arc<ControllerProxy>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn state(&self) -> ControllerState {
        lock(&self.lifecycle).state
    }

    /// Moves to `next` if the lifecycle allows it; returns whether it moved.
    pub fn transition(&self, next: ControllerState) -> bool {
        let mut lc = lock(&self.lifecycle);
        if lc.state.can_become(next) {
            lc.state = next;
            true
        } else {
            tracing::trace!(
                controller = %self.id,
                from = ?lc.state,
                to = ?next,
                "ignored lifecycle transition"
            );
            false
        }
    }

    pub fn is_live(&self) -> bool {
        self.state().is_live()
    }

    pub fn is_dismissed(&self) -> bool {
        self.state().is_dismissed()
    }

    pub fn activation_held(&self) -> bool {
        lock(&self.lifecycle).hold_activation
    }

    pub fn release_activation_hold(&self) {
        lock(&self.lifecycle).hold_activation = false;
    }

    /// Stores the freshly built controller.
    pub fn install(&self, controller: Box<dyn AnyController>) {
        *lock(&self.controller) = Some(controller);
    }

    pub fn set_view(&self, view: ViewRef) {
        *lock(&self.view) = Some(view);
    }

    pub fn view(&self) -> Option<ViewRef> {
        lock(&self.view).clone()
    }

    /// Locks the controller slot, or returns `None` when the calling thread is already
    /// running this controller's code.
    ///
    /// Other threads wait for the slot; only the owning thread is turned away.
    fn enter(&self) -> Option<SlotGuard<'_>> {
        let me = thread::current().id();
        if *lock(&self.owner) == Some(me) {
            tracing::debug!(controller = %self.id, "re-entrant call into a busy controller");
            return None;
        }
        let slot = lock(&self.controller);
        *lock(&self.owner) = Some(me);
        Some(SlotGuard {
            slot,
            owner: &self.owner,
        })
    }

    /// Runs a lifecycle hook if the controller exposes events.
    pub fn invoke(&self, hook: Hook) -> Result<(), PresentError> {
        let Some(mut slot) = self.enter() else {
            return Ok(());
        };
        let Some(ctrl) = slot.as_mut() else {
            return Ok(());
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            match ctrl.controller().events() {
                Some(events) => hook.call(events),
                None => Ok(()),
            }
        }));

        let error = match outcome {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(e)) => e.to_string(),
            Err(panic_err) => format!("panicked: {}", panic_message(panic_err.as_ref())),
        };
        Err(PresentError::Callback {
            controller: self.name(),
            hook: hook.as_str(),
            error,
        })
    }

    /// Offers a command to the controller.
    ///
    /// Liveness is checked while the controller is held, so a controller that the
    /// operation loop has started dismissing never sees the command.
    pub fn handle_command(&self, command: &Command) -> Result<bool, PresentError> {
        let Some(mut slot) = self.enter() else {
            return Ok(false);
        };
        if !self.is_live() {
            return Ok(false);
        }
        let Some(ctrl) = slot.as_mut() else {
            return Ok(false);
        };

        panic::catch_unwind(AssertUnwindSafe(|| ctrl.controller().handle_command(command)))
            .map_err(|panic_err| PresentError::Callback {
                controller: self.name(),
                hook: "handle_command",
                error: format!("panicked: {}", panic_message(panic_err.as_ref())),
            })
    }

    /// Runs `f` on the controller if it is a `C`.
    pub fn with_controller<C: 'static, R>(&self, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        let mut slot = self.enter()?;
        let ctrl = slot.as_mut()?.as_any().downcast_mut::<C>()?;
        Some(f(ctrl))
    }

    pub fn set_result(&self, value: Box<dyn Any + Send>) {
        *lock(&self.result) = Some(value);
    }

    /// Takes the dismiss result if it has type `T`.
    pub fn take_result<T: 'static>(&self) -> Option<T> {
        let mut slot = lock(&self.result);
        match slot.take()?.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(other) => {
                *slot = Some(other);
                None
            }
        }
    }

    /// Completed when the proxy has been disposed.
    pub fn dismissed_token(&self) -> CancellationToken {
        self.dismissed.clone()
    }

    /// Drops the controller, releases the view and marks the proxy disposed.
    ///
    /// Safe to call more than once; only the first call does anything.
    pub fn dispose(&self, views: &dyn ViewFactory) -> Result<(), ViewError> {
        {
            let mut lc = lock(&self.lifecycle);
            if lc.state == ControllerState::Disposed {
                return Ok(());
            }
            lc.state = ControllerState::Disposed;
        }

        let controller = lock(&self.controller).take();
        if let Err(panic_err) = panic::catch_unwind(AssertUnwindSafe(move || drop(controller))) {
            tracing::warn!(
                controller = %self.id,
                panic = %panic_message(panic_err.as_ref()),
                "controller panicked while dropping"
            );
        }

        let released = match lock(&self.view).take() {
            Some(view) => panic::catch_unwind(AssertUnwindSafe(|| views.release_view(view)))
                .unwrap_or_else(|panic_err| {
                    Err(ViewError::Release(format!(
                        "panicked: {}",
                        panic_message(panic_err.as_ref())
                    )))
                }),
            None => Ok(()),
        };

        self.dismissed.cancel();
        released
    }
}
