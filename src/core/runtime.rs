//! # Operation loop.
//!
//! One task per presenter drains the operation queue and runs each operation to
//! completion before taking the next one. That single consumer is what makes stack
//! mutation atomic with respect to lifecycle dispatch.
//!
//! ```text
//! loop {
//!   select! {
//!     shutdown        ─► break
//!     recv(op)        ─► begin? ─► run ─► complete (publish outcome)
//!   }
//! }
//! close queue ─► cancel every queued op ─► dismiss the whole stack ─► stopped
//! ```
//!
//! The loop only holds a weak reference to the presenter between operations, so
//! dropping the last `Arc<Presenter>` ends it.

use std::sync::{Arc, Weak};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::Presenter;
use crate::core::dismiss::Blame;
use crate::events::{Event, EventKind};
use crate::operations::{Operation, OperationKind, OperationState, OperationStatus};

pub(super) struct OperationLoop {
    presenter: Weak<Presenter>,
    rx: mpsc::Receiver<Operation>,
    runtime_token: CancellationToken,
    stopped: CancellationToken,
}

impl OperationLoop {
    pub fn new(
        presenter: Weak<Presenter>,
        rx: mpsc::Receiver<Operation>,
        runtime_token: CancellationToken,
        stopped: CancellationToken,
    ) -> Self {
        Self {
            presenter,
            rx,
            runtime_token,
            stopped,
        }
    }

    /// Starts the loop (spawns in background).
    pub fn spawn(self) {
        tokio::spawn(async move {
            let stopped = self.stopped.clone();
            if let Err(e) = self.run().await {
                tracing::warn!(error = %e, "operation loop stopped early");
            }
            stopped.cancel();
        });
    }

    async fn run(mut self) -> anyhow::Result<()> {
        loop {
            let op = tokio::select! {
                biased;
                _ = self.runtime_token.cancelled() => break,
                op = self.rx.recv() => match op {
                    Some(op) => op,
                    None => break,
                },
            };

            let Some(presenter) = self.presenter.upgrade() else {
                op.state().abort();
                break;
            };
            presenter.execute(op).await;
        }

        self.rx.close();
        let presenter = self.presenter.upgrade();
        while let Ok(op) = self.rx.try_recv() {
            let state = Arc::clone(op.state());
            drop(op);
            if state.abort() {
                if let Some(p) = &presenter {
                    p.publish_outcome(&state);
                }
            }
        }

        let Some(presenter) = presenter else {
            anyhow::bail!("presenter dropped before its stack was torn down");
        };
        presenter.dismiss_everything(Blame::Report(None));
        tracing::debug!("operation loop finished");
        Ok(())
    }
}

impl Presenter {
    /// Runs one operation and publishes its outcome.
    async fn execute(&self, op: Operation) {
        let state = Arc::clone(op.state());
        if !state.begin() {
            // canceled while queued
            self.publish_outcome(&state);
            return;
        }
        self.bus.publish(Event::new(EventKind::OperationStarted).with_operation(state.id(), state.kind()));

        match op {
            Operation::Present(req) => self.run_present(req).await,
            Operation::Dismiss { state, target } => self.run_dismiss(&state, &target),
            Operation::DismissAll { state } => self.run_dismiss_all(&state),
        }

        state.finish();
        self.publish_outcome(&state);
    }

    fn publish_outcome(&self, state: &OperationState) {
        let mut ev = match state.status() {
            OperationStatus::Succeeded => Event::new(EventKind::OperationSucceeded),
            OperationStatus::Canceled => Event::new(EventKind::OperationCanceled),
            OperationStatus::Faulted => {
                let mut ev = Event::new(EventKind::OperationFaulted);
                if let Some(e) = state.first_error() {
                    ev = ev.with_reason(e.as_message());
                }
                ev
            }
            OperationStatus::Pending | OperationStatus::Running => return,
        };
        ev = ev.with_operation(state.id(), state.kind());
        if state.kind() == OperationKind::Present {
            if let Some(proxy) = state.proxy() {
                ev = ev.for_proxy(proxy);
            }
        }
        self.bus.publish(ev);
    }
}
