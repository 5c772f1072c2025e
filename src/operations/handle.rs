//! # Caller-visible operation handles.
//!
//! - [`OperationHandle`] observes any queued operation (status, errors, completion).
//! - [`PresentHandle`] adds the presented controller on top of that: access to the
//!   controller, dismissal, dismissal notification and the dismiss result.
//!
//! Handles are cheap to clone and never keep a controller alive on their own: once
//! the controller is dismissed, the handle only reports `is_dismissed() == true`.

use std::sync::{Arc, Weak};

use crate::controllers::ControllerRef;
use crate::core::Presenter;
use crate::error::PresentError;
use crate::operations::operation::{OperationId, OperationKind, OperationState, OperationStatus};

/// Handle to a queued operation.
#[derive(Clone, Debug)]
pub struct OperationHandle {
    pub(crate) state: Arc<OperationState>,
}

impl OperationHandle {
    pub(crate) fn new(state: Arc<OperationState>) -> Self {
        Self { state }
    }

    /// A handle for a request made after the presenter went away.
    pub(crate) fn closed(kind: OperationKind) -> Self {
        Self::new(OperationState::rejected(OperationId(0), kind, PresentError::Closed))
    }

    #[inline]
    pub fn id(&self) -> OperationId {
        self.state.id()
    }

    #[inline]
    pub fn kind(&self) -> OperationKind {
        self.state.kind()
    }

    pub fn status(&self) -> OperationStatus {
        self.state.status()
    }

    pub fn is_completed(&self) -> bool {
        self.status().is_completed()
    }

    /// Every error the operation recorded, in order.
    pub fn errors(&self) -> Vec<PresentError> {
        self.state.errors()
    }

    /// Cancels the operation if it has not started; interrupts it if it is running.
    ///
    /// Returns `false` when the operation has already completed.
    pub fn cancel(&self) -> bool {
        self.state.cancel()
    }

    /// Waits for completion.
    ///
    /// Returns the first recorded error for faulted operations and
    /// [`PresentError::Canceled`] for canceled ones.
    pub async fn wait(&self) -> Result<(), PresentError> {
        match self.state.completion().await {
            OperationStatus::Succeeded => Ok(()),
            OperationStatus::Canceled => Err(PresentError::Canceled),
            _ => Err(self.state.first_error().unwrap_or(PresentError::Closed)),
        }
    }
}

/// Handle returned by `present`.
///
/// # Example
/// ```no_run
/// # use viewvisor::{Presenter, PresentArgs, Presentable};
/// # async fn demo<C: Presentable>(presenter: &Presenter) -> Result<(), viewvisor::PresentError> {
/// let handle = presenter.present::<C>(PresentArgs::new());
/// let controller = handle.wait().await?;
/// assert!(!handle.is_dismissed());
///
/// handle.dismiss().wait().await?;
/// assert!(handle.is_dismissed());
/// # let _ = controller;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct PresentHandle {
    op: OperationHandle,
    presenter: Weak<Presenter>,
}

impl PresentHandle {
    pub(crate) fn new(state: Arc<OperationState>, presenter: Weak<Presenter>) -> Self {
        Self {
            op: OperationHandle::new(state),
            presenter,
        }
    }

    pub(crate) fn closed() -> Self {
        Self {
            op: OperationHandle::closed(OperationKind::Present),
            presenter: Weak::new(),
        }
    }

    /// Underlying operation.
    pub fn operation(&self) -> &OperationHandle {
        &self.op
    }

    #[inline]
    pub fn id(&self) -> OperationId {
        self.op.id()
    }

    pub fn status(&self) -> OperationStatus {
        self.op.status()
    }

    pub fn errors(&self) -> Vec<PresentError> {
        self.op.errors()
    }

    /// See [`OperationHandle::cancel`].
    pub fn cancel(&self) -> bool {
        self.op.cancel()
    }

    /// The presented controller; `None` until it is on the stack, and forever if the
    /// present fails.
    pub fn controller(&self) -> Option<ControllerRef> {
        if matches!(self.status(), OperationStatus::Faulted | OperationStatus::Canceled) {
            return None;
        }
        self.op
            .state
            .proxy()
            .map(|p| ControllerRef::new(Arc::clone(p), self.presenter.clone()))
    }

    /// `true` once the controller is being dismissed or is gone, or if it never came up.
    pub fn is_dismissed(&self) -> bool {
        match self.op.state.proxy() {
            Some(p) => p.is_dismissed(),
            None => self.op.is_completed(),
        }
    }

    /// Waits for the present to complete and returns the controller.
    pub async fn wait(&self) -> Result<ControllerRef, PresentError> {
        self.op.wait().await?;
        self.controller().ok_or(PresentError::Closed)
    }

    /// Dismisses the controller.
    ///
    /// A present that has not pushed anything yet is canceled (or interrupted) instead;
    /// the returned handle then completes immediately.
    pub fn dismiss(&self) -> OperationHandle {
        let presenter = self.presenter.upgrade();
        if let (Some(p), Some(presenter)) = (self.op.state.proxy(), presenter.as_ref()) {
            return presenter.dismiss_proxy(Arc::clone(p));
        }

        self.op.cancel();
        match (self.op.state.proxy(), presenter) {
            (Some(p), Some(presenter)) => presenter.dismiss_proxy(Arc::clone(p)),
            _ => OperationHandle::new(finished(self.op.id(), OperationKind::Dismiss)),
        }
    }

    /// Resolves once the controller has been disposed (or immediately if it never came up).
    pub async fn dismissed(&self) {
        self.op.state.completion().await;
        if let Some(p) = self.op.state.proxy() {
            p.dismissed_token().cancelled().await;
        }
    }

    /// Takes the value the controller passed to
    /// [`ControllerContext::dismiss_with`](crate::ControllerContext::dismiss_with).
    pub fn take_result<T: 'static>(&self) -> Option<T> {
        self.op.state.proxy()?.take_result::<T>()
    }
}

/// An operation that had nothing to do.
fn finished(id: OperationId, kind: OperationKind) -> Arc<OperationState> {
    let op = OperationState::new(id, kind);
    op.begin();
    op.finish();
    op
}
