//! # What a controller knows about its own presentation.
//!
//! [`ControllerContext`] is handed to [`Presentable::create`](crate::Presentable::create).
//! Controllers keep it for as long as they like: it holds weak links only, so it never
//! keeps the presenter or the stack node alive.
//!
//! From the context a controller can
//! - read its arguments and its view;
//! - dismiss itself, optionally leaving a typed result behind;
//! - present further controllers, optionally as its children.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::controllers::{Blueprint, ControllerId, ControllerProxy, PresentArgs, Presentable};
use crate::core::Presenter;
use crate::operations::{OperationHandle, OperationKind, PresentHandle};
use crate::policies::PresentFlags;
use crate::services::ViewRef;

/// Per-controller view of the presenter.
#[derive(Clone)]
pub struct ControllerContext {
    id: ControllerId,
    args: PresentArgs,
    proxy: Weak<ControllerProxy>,
    presenter: Weak<Presenter>,
}

impl ControllerContext {
    pub(crate) fn new(proxy: &Arc<ControllerProxy>, presenter: Weak<Presenter>) -> Self {
        Self {
            id: proxy.id(),
            args: proxy.args().clone(),
            proxy: Arc::downgrade(proxy),
            presenter,
        }
    }

    #[inline]
    pub fn id(&self) -> ControllerId {
        self.id
    }

    /// Arguments the controller was presented with.
    #[inline]
    pub fn args(&self) -> &PresentArgs {
        &self.args
    }

    /// The controller's view; `None` during construction and after disposal.
    pub fn view(&self) -> Option<ViewRef> {
        self.proxy.upgrade()?.view()
    }

    /// The view downcast to its concrete type.
    pub fn view_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.view()?.downcast::<T>().ok()
    }

    pub fn is_dismissed(&self) -> bool {
        self.proxy.upgrade().is_none_or(|p| p.is_dismissed())
    }

    /// Queues dismissal of this controller and its children.
    pub fn dismiss(&self) -> OperationHandle {
        match (self.proxy.upgrade(), self.presenter.upgrade()) {
            (Some(proxy), Some(presenter)) => presenter.dismiss_proxy(proxy),
            _ => OperationHandle::closed(OperationKind::Dismiss),
        }
    }

    /// Stores `value` for [`PresentHandle::take_result`] and queues dismissal.
    pub fn dismiss_with<T: Any + Send>(&self, value: T) -> OperationHandle {
        if let Some(proxy) = self.proxy.upgrade() {
            proxy.set_result(Box::new(value));
        }
        self.dismiss()
    }

    /// Presents `C`. Unless `C` or `args` carry `CHILD`, the new controller does not
    /// depend on this one and is presented even after this controller is gone.
    pub fn present<C: Presentable>(&self, args: PresentArgs) -> PresentHandle {
        self.present_blueprint(Blueprint::of::<C>(), args)
    }

    /// Presents `C` as a child: it goes away whenever this controller does.
    pub fn present_child<C: Presentable>(&self, args: PresentArgs) -> PresentHandle {
        self.present_blueprint(Blueprint::of::<C>(), args.with_flags(PresentFlags::CHILD))
    }

    fn present_blueprint(&self, blueprint: Blueprint, args: PresentArgs) -> PresentHandle {
        let Some(presenter) = self.presenter.upgrade() else {
            return PresentHandle::closed();
        };
        let child = (blueprint.flags | args.flags()).contains(PresentFlags::CHILD);
        let parent = child.then(|| self.proxy.clone());
        presenter.present_from(parent, blueprint, args)
    }
}

impl fmt::Debug for ControllerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerContext")
            .field("id", &self.id)
            .field("args", &self.args)
            .finish()
    }
}
