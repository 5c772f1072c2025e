//! # Present algorithm.
//!
//! ```text
//! present(C, args)
//!   (a) deactivate the current top
//!   (b) policy dismissals: singleton, DISMISS_CURRENT / DISMISS_ALL   (never rolled back)
//!   (c) build the controller                                          ── fail → fault
//!   (d) await the view (timeout, interrupt)                           ── fail → dispose, fault
//!   (e) push
//!   (f) on_present                                                    ── fail → remove, dispose, fault
//!   (g) activate the top
//!   (h) complete with the controller
//! ```
//!
//! Every failure path re-runs activation so the stack never ends up without an
//! active top it should have.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;

use crate::controllers::{ControllerContext, ControllerProxy, ControllerState, Hook};
use crate::core::Presenter;
use crate::core::dismiss::Blame;
use crate::error::{ControllerError, PresentError, panic_message};
use crate::events::{Event, EventKind};
use crate::operations::{OperationState, PresentRequest};
use crate::policies::{self, DismissScope};
use crate::services::{CommandSink, Resolver, ViewRef, ViewRequest};
use crate::sync::lock;

impl Presenter {
    pub(super) async fn run_present(&self, req: PresentRequest) {
        let PresentRequest {
            state: op,
            blueprint,
            args,
            flags,
            parent,
        } = req;
        let name = blueprint.kind.short_name();

        let parent = match parent.map(|weak| weak.upgrade()) {
            None => None,
            Some(Some(p)) if p.is_live() => Some(p),
            Some(_) => {
                op.push_error(PresentError::ParentDismissed { controller: name });
                return;
            }
        };

        // (a)
        self.deactivate_top();

        let plan = {
            let stack = lock(&self.stack);
            policies::resolve(flags, blueprint.kind, parent.is_some(), &stack)
        };
        let plan = match plan {
            Ok(plan) => plan,
            Err(e) => return self.abandon(&op, e),
        };

        // (b)
        let side_effects = Blame::Report(Some(op.as_ref()));
        if let Some(existing) = &plan.singleton {
            self.dismiss_tree(existing, side_effects);
        }
        match &plan.dismiss {
            DismissScope::Nothing => {}
            DismissScope::Current(top) => self.dismiss_tree(top, side_effects),
            DismissScope::All => self.dismiss_everything(side_effects),
        }
        if parent.as_ref().is_some_and(|p| !p.is_live()) {
            return self.abandon(&op, PresentError::ParentDismissed { controller: name });
        }

        // (c)
        let proxy = ControllerProxy::new(
            self.next_controller_id(),
            blueprint.kind,
            plan.flags,
            args,
            parent.as_ref(),
        );
        let ctx = ControllerContext::new(&proxy, self.me.clone());
        let services = Resolver::new(self.services.as_ref());
        let built = panic::catch_unwind(AssertUnwindSafe(|| (blueprint.create)(ctx, &services)));
        let controller = match built {
            Ok(Ok(controller)) => controller,
            Ok(Err(ControllerError::Unresolved { service })) => {
                return self.discard(&op, &proxy, PresentError::Unresolved { controller: name, service });
            }
            Ok(Err(e)) => {
                let error = e.to_string();
                return self.discard(&op, &proxy, PresentError::Construction { controller: name, error });
            }
            Err(panic_err) => {
                let error = format!("panicked: {}", panic_message(panic_err.as_ref()));
                return self.discard(&op, &proxy, PresentError::Construction { controller: name, error });
            }
        };
        proxy.install(controller);
        proxy.transition(ControllerState::Presenting);

        // (d)
        let request = ViewRequest {
            controller: blueprint.kind,
            controller_id: proxy.id(),
            z_order: lock(&self.stack).len(),
            flags: plan.flags,
            parent_slot: proxy.args().parent_slot().map(Arc::from),
            commands: CommandSink::new(self.me.clone(), proxy.id()),
        };
        match self.acquire_view(&op, name, request).await {
            Ok(view) => proxy.set_view(view),
            Err(e) => return self.discard(&op, &proxy, e),
        }
        if !op.commit(Arc::clone(&proxy)) {
            return self.discard(&op, &proxy, PresentError::Interrupted { controller: name });
        }

        // (e)
        {
            let mut stack = lock(&self.stack);
            if let Some(below) = stack.peek() {
                below.release_activation_hold();
            }
            stack.push(Arc::clone(&proxy));
        }
        proxy.transition(ControllerState::Inactive);

        // (f)
        if let Err(e) = proxy.invoke(Hook::Present) {
            self.report_callback(&proxy, &e);
            proxy.transition(ControllerState::Dismissing);
            lock(&self.stack).remove(proxy.id());
            return self.discard(&op, &proxy, e);
        }
        self.bus.publish(
            Event::new(EventKind::ControllerPresented)
                .for_proxy(&proxy)
                .with_operation(op.id(), op.kind()),
        );

        // (g)
        self.activate_top();
    }

    /// Waits for the view factory, bounded by the view timeout, the operation's
    /// interrupt and presenter shutdown.
    async fn acquire_view(
        &self,
        op: &OperationState,
        controller: &'static str,
        request: ViewRequest,
    ) -> Result<ViewRef, PresentError> {
        let load = AssertUnwindSafe(self.views.create_view(request)).catch_unwind();
        let load = with_timeout(self.cfg.view_timeout(), load);

        let outcome = tokio::select! {
            biased;
            _ = op.interrupt_token().cancelled() => {
                return Err(PresentError::Interrupted { controller });
            }
            _ = self.runtime_token().cancelled() => {
                return Err(PresentError::Interrupted { controller });
            }
            outcome = load => outcome,
        };

        match outcome {
            Some(Ok(Ok(view))) => Ok(view),
            Some(Ok(Err(e))) => Err(PresentError::ViewLoad {
                controller,
                error: e.to_string(),
            }),
            Some(Err(panic_err)) => Err(PresentError::ViewLoad {
                controller,
                error: format!("panicked: {}", panic_message(panic_err.as_ref())),
            }),
            None => Err(PresentError::ViewTimeout {
                controller,
                timeout: self.cfg.view_timeout,
            }),
        }
    }

    /// Fails the present before anything of it was built.
    fn abandon(&self, op: &OperationState, error: PresentError) {
        op.push_error(error);
        self.activate_top();
    }

    /// Fails the present and disposes its partially built controller.
    fn discard(&self, op: &OperationState, proxy: &ControllerProxy, error: PresentError) {
        op.push_error(error);
        self.dispose(proxy);
        self.activate_top();
    }
}

/// `None` when `timeout` elapses first.
async fn with_timeout<F: Future>(timeout: Option<std::time::Duration>, fut: F) -> Option<F::Output> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut).await.ok(),
        None => Some(fut.await),
    }
}
