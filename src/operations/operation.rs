//! # Operation state shared between the queue and caller handles.
//!
//! An operation is created `Pending` when requested, becomes `Running` when the
//! operation loop picks it up and ends in exactly one terminal status:
//!
//! ```text
//! Pending ──► Running ──► Succeeded
//!    │           └──────► Faulted   (errors recorded)
//!    └──────────────────► Canceled  (canceled before it started)
//! ```
//!
//! Status changes are published through a `tokio::sync::watch` channel so any number
//! of handles can await completion.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::controllers::ControllerProxy;
use crate::error::PresentError;
use crate::sync::lock;

/// Identity of an operation, unique within one presenter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(pub(crate) u64);

impl OperationId {
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op{}", self.0)
    }
}

/// What an operation does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    /// Push one controller.
    Present,
    /// Dismiss one controller (and its children).
    Dismiss,
    /// Dismiss the whole stack.
    DismissAll,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Present => "present",
            OperationKind::Dismiss => "dismiss",
            OperationKind::DismissAll => "dismiss_all",
        }
    }
}

/// Completion state of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationStatus {
    Pending,
    Running,
    Succeeded,
    Faulted,
    Canceled,
}

impl OperationStatus {
    #[inline]
    pub fn is_completed(self) -> bool {
        matches!(
            self,
            OperationStatus::Succeeded | OperationStatus::Faulted | OperationStatus::Canceled
        )
    }
}

/// Shared state of one operation.
pub(crate) struct OperationState {
    id: OperationId,
    kind: OperationKind,
    status: watch::Sender<OperationStatus>,
    errors: Mutex<Vec<PresentError>>,
    interrupt: CancellationToken,
    /// Orders `cancel` against `commit`.
    gate: Mutex<()>,
    proxy: OnceLock<Arc<ControllerProxy>>,
}

impl OperationState {
    pub fn new(id: OperationId, kind: OperationKind) -> Arc<Self> {
        let (status, _) = watch::channel(OperationStatus::Pending);
        Arc::new(Self {
            id,
            kind,
            status,
            errors: Mutex::new(Vec::new()),
            interrupt: CancellationToken::new(),
            gate: Mutex::new(()),
            proxy: OnceLock::new(),
        })
    }

    /// An operation that faulted before it could be queued.
    pub fn rejected(id: OperationId, kind: OperationKind, error: PresentError) -> Arc<Self> {
        let op = Self::new(id, kind);
        op.push_error(error);
        op.status.send_replace(OperationStatus::Faulted);
        op
    }

    #[inline]
    pub fn id(&self) -> OperationId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn status(&self) -> OperationStatus {
        *self.status.borrow()
    }

    /// `Pending → Running`; returns `false` if the operation was canceled meanwhile.
    pub fn begin(&self) -> bool {
        self.status.send_if_modified(|s| {
            if *s == OperationStatus::Pending {
                *s = OperationStatus::Running;
                true
            } else {
                false
            }
        })
    }

    /// Cancels a pending operation or interrupts a running one.
    ///
    /// Returns `false` once the operation has completed.
    pub fn cancel(&self) -> bool {
        let _gate = lock(&self.gate);
        let canceled = self.status.send_if_modified(|s| {
            if *s == OperationStatus::Pending {
                *s = OperationStatus::Canceled;
                true
            } else {
                false
            }
        });
        if canceled {
            return true;
        }
        if self.status() == OperationStatus::Running {
            self.interrupt.cancel();
            return true;
        }
        false
    }

    /// Fires when a running operation is asked to stop.
    pub fn interrupt_token(&self) -> &CancellationToken {
        &self.interrupt
    }

    pub fn push_error(&self, error: PresentError) {
        lock(&self.errors).push(error);
    }

    /// Completes a running operation: `Faulted` if any error was recorded.
    pub fn finish(&self) -> OperationStatus {
        let next = if lock(&self.errors).is_empty() {
            OperationStatus::Succeeded
        } else {
            OperationStatus::Faulted
        };
        self.status.send_if_modified(|s| {
            if s.is_completed() {
                false
            } else {
                *s = next;
                true
            }
        });
        self.status()
    }

    /// Records `error` and completes the operation.
    pub fn fault(&self, error: PresentError) -> OperationStatus {
        self.push_error(error);
        self.finish()
    }

    /// Completes a not yet finished operation as `Canceled` (presenter shutdown).
    pub fn abort(&self) -> bool {
        self.status.send_if_modified(|s| {
            if s.is_completed() {
                false
            } else {
                *s = OperationStatus::Canceled;
                true
            }
        })
    }

    pub fn errors(&self) -> Vec<PresentError> {
        lock(&self.errors).clone()
    }

    pub fn first_error(&self) -> Option<PresentError> {
        lock(&self.errors).first().cloned()
    }

    /// Publishes the presented proxy unless the operation was interrupted first.
    ///
    /// After a successful commit, `cancel` no longer stops the present; callers
    /// dismiss the published proxy instead.
    pub fn commit(&self, proxy: Arc<ControllerProxy>) -> bool {
        let _gate = lock(&self.gate);
        if self.interrupt.is_cancelled() {
            return false;
        }
        self.proxy.set(proxy).is_ok()
    }

    pub fn proxy(&self) -> Option<&Arc<ControllerProxy>> {
        self.proxy.get()
    }

    /// Waits until the operation reaches a terminal status.
    pub async fn completion(&self) -> OperationStatus {
        let mut rx = self.status.subscribe();
        let done = rx.wait_for(|s| s.is_completed()).await.map(|s| *s);
        done.unwrap_or_else(|_| self.status())
    }
}

impl fmt::Debug for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationState")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op() -> Arc<OperationState> {
        OperationState::new(OperationId(1), OperationKind::Present)
    }

    #[test]
    fn canceled_operations_never_start() {
        let op = op();
        assert!(op.cancel());
        assert_eq!(op.status(), OperationStatus::Canceled);
        assert!(!op.begin());
        assert!(!op.cancel());
    }

    #[test]
    fn canceling_a_running_operation_interrupts_it() {
        let op = op();
        assert!(op.begin());
        assert!(op.cancel());
        assert!(op.interrupt_token().is_cancelled());
        assert_eq!(op.status(), OperationStatus::Running);
    }

    #[test]
    fn finish_reflects_recorded_errors() {
        let ok = op();
        ok.begin();
        assert_eq!(ok.finish(), OperationStatus::Succeeded);

        let bad = op();
        bad.begin();
        assert_eq!(bad.fault(PresentError::Closed), OperationStatus::Faulted);
        assert_eq!(bad.first_error(), Some(PresentError::Closed));
        // Terminal status is sticky.
        assert!(!bad.abort());
        assert_eq!(bad.status(), OperationStatus::Faulted);
    }

    #[test]
    fn rejected_is_faulted_immediately() {
        let op = OperationState::rejected(OperationId(2), OperationKind::Dismiss, PresentError::QueueFull);
        assert_eq!(op.status(), OperationStatus::Faulted);
        assert_eq!(op.errors(), vec![PresentError::QueueFull]);
    }

    #[test]
    fn interrupted_operations_refuse_to_commit() {
        use crate::controllers::{ControllerId, ControllerType, PresentArgs};
        use crate::policies::PresentFlags;

        let proxy = || {
            ControllerProxy::new(
                ControllerId(1),
                ControllerType::of::<u8>(),
                PresentFlags::NONE,
                PresentArgs::new(),
                None,
            )
        };

        let op = op();
        op.begin();
        assert!(op.commit(proxy()));
        assert!(op.proxy().is_some());

        let late = OperationState::new(OperationId(3), OperationKind::Present);
        late.begin();
        late.cancel();
        assert!(!late.commit(proxy()));
        assert!(late.proxy().is_none());
    }

    #[tokio::test]
    async fn completion_wakes_waiters() {
        let op = op();
        let waiter = {
            let op = Arc::clone(&op);
            tokio::spawn(async move { op.completion().await })
        };
        op.begin();
        op.finish();
        assert_eq!(waiter.await.unwrap(), OperationStatus::Succeeded);
    }
}
