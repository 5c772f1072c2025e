//! # ControllerRef: a caller-side handle to one presented controller.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Instant;

use crate::controllers::{ControllerId, ControllerProxy, ControllerState, ControllerType, PresentArgs};
use crate::core::Presenter;
use crate::operations::{OperationHandle, OperationKind};
use crate::policies::PresentFlags;
use crate::services::ViewRef;

/// Reference to a controller on (or formerly on) the stack.
///
/// Holding a `ControllerRef` does not keep the controller on the stack: after a dismiss
/// the reference only reports its final state.
#[derive(Clone)]
pub struct ControllerRef {
    proxy: Arc<ControllerProxy>,
    presenter: Weak<Presenter>,
}

impl ControllerRef {
    pub(crate) fn new(proxy: Arc<ControllerProxy>, presenter: Weak<Presenter>) -> Self {
        Self { proxy, presenter }
    }

    pub(crate) fn proxy(&self) -> &Arc<ControllerProxy> {
        &self.proxy
    }

    #[inline]
    pub fn id(&self) -> ControllerId {
        self.proxy.id()
    }

    #[inline]
    pub fn kind(&self) -> ControllerType {
        self.proxy.kind()
    }

    /// Short type name, e.g. `"Inventory"`.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.proxy.name()
    }

    /// `true` if the controller is a `C`.
    pub fn is<C: 'static>(&self) -> bool {
        self.proxy.kind() == ControllerType::of::<C>()
    }

    /// Effective stacking flags.
    #[inline]
    pub fn flags(&self) -> PresentFlags {
        self.proxy.flags()
    }

    pub fn state(&self) -> ControllerState {
        self.proxy.state()
    }

    pub fn is_active(&self) -> bool {
        self.state() == ControllerState::Active
    }

    pub fn is_dismissed(&self) -> bool {
        self.proxy.is_dismissed()
    }

    pub fn args(&self) -> &PresentArgs {
        self.proxy.args()
    }

    pub fn tag(&self) -> Option<&str> {
        self.proxy.args().tag()
    }

    pub fn presented_at(&self) -> Instant {
        self.proxy.presented_at()
    }

    pub fn view(&self) -> Option<ViewRef> {
        self.proxy.view()
    }

    /// Runs `f` against the controller if it is a live `C`.
    ///
    /// Blocks while the presenter is calling into the same controller.
    pub fn with<C: Any, R>(&self, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        self.proxy.with_controller(f)
    }

    /// Queues dismissal of the controller and its children.
    pub fn dismiss(&self) -> OperationHandle {
        match self.presenter.upgrade() {
            Some(presenter) => presenter.dismiss_proxy(Arc::clone(&self.proxy)),
            None => OperationHandle::closed(OperationKind::Dismiss),
        }
    }
}

impl PartialEq for ControllerRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ControllerRef {}

impl fmt::Debug for ControllerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRef")
            .field("id", &self.id())
            .field("kind", &self.kind())
            .field("state", &self.state())
            .field("flags", &self.flags())
            .finish()
    }
}
