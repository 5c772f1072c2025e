//! # Presenter: owner of the presentation stack.
//!
//! The presenter accepts present/dismiss requests from any thread, queues them as
//! operations and lets a single operation loop apply them to the stack one at a
//! time. Everything user-facing goes through here:
//!
//! - **Requests**: [`present`](Presenter::present), [`present_named`](Presenter::present_named),
//!   [`open`](Presenter::open), [`dismiss`](Presenter::dismiss),
//!   [`dismiss_all`](Presenter::dismiss_all)
//! - **Commands**: [`dispatch`](Presenter::dispatch)
//! - **Snapshots**: [`controllers`](Presenter::controllers), [`peek`](Presenter::peek),
//!   [`active_controller`](Presenter::active_controller), [`find_tagged`](Presenter::find_tagged)
//! - **Observability**: [`subscribe`](Presenter::subscribe)
//! - **Lifecycle**: [`shutdown`](Presenter::shutdown)
//!
//! ## Architecture
//! ```text
//! present() / dismiss() ──► validate ──► mpsc queue ──► operation loop
//!        │ (sync)                          (bounded)      │ one at a time
//!        └──► handle                                      ├─► policy dismissals
//!                                                         ├─► construct + view
//!                                                         ├─► stack push/remove
//!                                                         └─► lifecycle hooks
//! dispatch() ──► top-down walk over a stack snapshot (caller's thread)
//! ```
//!
//! ## Rules
//! - Requests never block; a full queue faults the handle with `QueueFull`.
//! - Invalid flags and unknown names fault the handle before anything is queued.
//! - After [`shutdown`](Presenter::shutdown) every request faults with `Closed`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::controllers::{
    Blueprint, ControllerId, ControllerProxy, ControllerRef, ControllerRegistry, ControllerState,
    ControllerType, PresentArgs, Presentable,
};
use crate::core::config::PresenterConfig;
use crate::core::stack::Stack;
use crate::error::{ControllerError, PresentError};
use crate::events::{Bus, Event, EventKind};
use crate::operations::{
    Operation, OperationHandle, OperationId, OperationKind, OperationState, PresentHandle,
    PresentRequest,
};
use crate::policies;
use crate::services::{Resolver, ServiceProvider, ViewFactory};
use crate::sync::lock;

/// Presentation-stack orchestrator.
///
/// Built with [`PresenterBuilder`](crate::PresenterBuilder); always used as `Arc<Presenter>`.
pub struct Presenter {
    pub(super) cfg: PresenterConfig,
    pub(super) bus: Bus,
    pub(super) views: Arc<dyn ViewFactory>,
    pub(super) services: Arc<dyn ServiceProvider>,
    registry: ControllerRegistry,

    pub(super) stack: Mutex<Stack>,
    tx: mpsc::Sender<Operation>,

    runtime_token: CancellationToken,
    /// Cancelled by the operation loop once the stack has been torn down.
    stopped: CancellationToken,

    next_controller: AtomicU64,
    next_operation: AtomicU64,
    pub(super) me: Weak<Presenter>,
}

impl Presenter {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new_internal(
        cfg: PresenterConfig,
        bus: Bus,
        views: Arc<dyn ViewFactory>,
        services: Arc<dyn ServiceProvider>,
        registry: ControllerRegistry,
        tx: mpsc::Sender<Operation>,
        runtime_token: CancellationToken,
        stopped: CancellationToken,
        me: Weak<Presenter>,
    ) -> Self {
        Self {
            cfg,
            bus,
            views,
            services,
            registry,
            stack: Mutex::new(Stack::new()),
            tx,
            runtime_token,
            stopped,
            next_controller: AtomicU64::new(1),
            next_operation: AtomicU64::new(1),
            me,
        }
    }

    pub fn config(&self) -> &PresenterConfig {
        &self.cfg
    }

    /// Name → type bindings used by [`present_named`](Self::present_named) and [`open`](Self::open).
    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    // ---- requests ----

    /// Queues presentation of `C`.
    pub fn present<C: Presentable>(&self, args: PresentArgs) -> PresentHandle {
        self.present_from(None, Blueprint::of::<C>(), args)
    }

    /// Queues presentation of the controller registered as `name`.
    pub fn present_named(&self, name: &str, args: PresentArgs) -> PresentHandle {
        match self.registry.blueprint(name) {
            Ok(blueprint) => self.present_from(None, blueprint, args),
            Err(e) => self.reject_present(e),
        }
    }

    /// Queues presentation of the controller a deep link points to.
    ///
    /// The last non-empty path segment names the controller (the host when the path
    /// is empty); query pairs and fragment become [`PresentArgs`].
    ///
    /// ```text
    /// app://menu/settings?tab=audio#volume  →  "settings", query tab=audio, fragment "volume"
    /// app://inventory                        →  "inventory"
    /// ```
    pub fn open(&self, link: &str) -> PresentHandle {
        match Self::resolve_link(link) {
            Ok((name, args)) => self.present_named(&name, args),
            Err(e) => self.reject_present(e),
        }
    }

    fn resolve_link(link: &str) -> Result<(String, PresentArgs), PresentError> {
        let invalid = |reason: String| PresentError::InvalidLink {
            link: link.to_owned(),
            reason,
        };

        let url = Url::parse(link).map_err(|e| invalid(e.to_string()))?;
        let from_path = url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()));
        let name = match from_path.or_else(|| url.host_str()) {
            Some(name) => name.to_owned(),
            None => return Err(invalid("link names no controller".into())),
        };
        Ok((name, PresentArgs::from_url(&url)))
    }

    /// Queues dismissal of `controller` and its children.
    pub fn dismiss(&self, controller: &ControllerRef) -> OperationHandle {
        self.dismiss_proxy(Arc::clone(controller.proxy()))
    }

    /// Queues dismissal of every controller, top to bottom.
    pub fn dismiss_all(&self) -> OperationHandle {
        let state = OperationState::new(self.next_operation_id(), OperationKind::DismissAll);
        self.submit(Operation::DismissAll { state: Arc::clone(&state) }, None);
        OperationHandle::new(state)
    }

    pub(crate) fn present_from(
        &self,
        parent: Option<Weak<ControllerProxy>>,
        blueprint: Blueprint,
        args: PresentArgs,
    ) -> PresentHandle {
        let state = OperationState::new(self.next_operation_id(), OperationKind::Present);
        let flags = blueprint.flags | args.flags();

        match policies::validate(flags).and_then(|()| self.check_services(&blueprint)) {
            Ok(()) => {
                let request = PresentRequest {
                    state: Arc::clone(&state),
                    blueprint,
                    args,
                    flags,
                    parent,
                };
                self.submit(Operation::Present(request), Some(blueprint.kind));
            }
            Err(e) => self.reject(&state, e),
        }
        PresentHandle::new(state, self.me.clone())
    }

    /// Resolves every declared dependency of `blueprint` up front.
    fn check_services(&self, blueprint: &Blueprint) -> Result<(), PresentError> {
        Resolver::new(self.services.as_ref())
            .require(blueprint.requires)
            .map_err(|e| match e {
                ControllerError::Unresolved { service } => PresentError::Unresolved {
                    controller: blueprint.kind.short_name(),
                    service,
                },
                other => PresentError::Construction {
                    controller: blueprint.kind.short_name(),
                    error: other.to_string(),
                },
            })
    }

    pub(crate) fn dismiss_proxy(&self, target: Arc<ControllerProxy>) -> OperationHandle {
        let state = OperationState::new(self.next_operation_id(), OperationKind::Dismiss);
        let kind = target.kind();
        self.submit(
            Operation::Dismiss {
                state: Arc::clone(&state),
                target,
            },
            Some(kind),
        );
        OperationHandle::new(state)
    }

    fn reject_present(&self, error: PresentError) -> PresentHandle {
        let state = OperationState::new(self.next_operation_id(), OperationKind::Present);
        self.reject(&state, error);
        PresentHandle::new(state, self.me.clone())
    }

    fn submit(&self, op: Operation, kind: Option<ControllerType>) {
        let state = Arc::clone(op.state());
        if self.runtime_token.is_cancelled() {
            self.reject(&state, PresentError::Closed);
            return;
        }

        match self.tx.try_send(op) {
            Ok(()) => {
                let mut ev = Event::new(EventKind::OperationQueued).with_operation(state.id(), state.kind());
                if let Some(kind) = kind {
                    ev = ev.with_controller(kind.short_name());
                }
                self.bus.publish(ev);
            }
            Err(mpsc::error::TrySendError::Full(_)) => self.reject(&state, PresentError::QueueFull),
            Err(mpsc::error::TrySendError::Closed(_)) => self.reject(&state, PresentError::Closed),
        }
    }

    fn reject(&self, state: &OperationState, error: PresentError) {
        let reason = error.as_message();
        state.fault(error);
        self.bus.publish(
            Event::new(EventKind::OperationFaulted)
                .with_operation(state.id(), state.kind())
                .with_reason(reason),
        );
    }

    pub(super) fn next_controller_id(&self) -> ControllerId {
        ControllerId(self.next_controller.fetch_add(1, Ordering::Relaxed))
    }

    fn next_operation_id(&self) -> OperationId {
        OperationId(self.next_operation.fetch_add(1, Ordering::Relaxed))
    }

    // ---- snapshots ----

    fn to_ref(&self, proxy: &Arc<ControllerProxy>) -> ControllerRef {
        ControllerRef::new(Arc::clone(proxy), self.me.clone())
    }

    /// Every controller on the stack, bottom to top.
    pub fn controllers(&self) -> Vec<ControllerRef> {
        lock(&self.stack).iter().map(|p| self.to_ref(p)).collect()
    }

    /// Topmost controller.
    pub fn peek(&self) -> Option<ControllerRef> {
        lock(&self.stack).peek().map(|p| self.to_ref(p))
    }

    /// The controller currently in `Active` state, if any.
    pub fn active_controller(&self) -> Option<ControllerRef> {
        lock(&self.stack)
            .top_down()
            .find(|p| p.state() == ControllerState::Active)
            .map(|p| self.to_ref(p))
    }

    /// Topmost controller of type `C`.
    pub fn find<C: 'static>(&self) -> Option<ControllerRef> {
        let kind = ControllerType::of::<C>();
        lock(&self.stack)
            .top_down()
            .find(|p| p.kind() == kind)
            .map(|p| self.to_ref(p))
    }

    /// Controllers presented with `tag`, bottom to top.
    pub fn find_tagged(&self, tag: &str) -> Vec<ControllerRef> {
        lock(&self.stack)
            .iter()
            .filter(|p| p.args().tag() == Some(tag))
            .map(|p| self.to_ref(p))
            .collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.stack).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.stack).is_empty()
    }

    // ---- observability / lifecycle ----

    /// Receiver for every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// `true` once shutdown was requested.
    pub fn is_closed(&self) -> bool {
        self.runtime_token.is_cancelled()
    }

    /// Stops the presenter.
    ///
    /// Queued operations complete as `Canceled`, a running present is interrupted,
    /// then the whole stack is dismissed. Resolves once teardown is done.
    pub async fn shutdown(&self) {
        if !self.runtime_token.is_cancelled() {
            self.bus.publish(Event::new(EventKind::ShutdownRequested));
            self.runtime_token.cancel();
        }
        self.stopped.cancelled().await;
    }

    pub(super) fn runtime_token(&self) -> &CancellationToken {
        &self.runtime_token
    }
}

impl Drop for Presenter {
    fn drop(&mut self) {
        self.runtime_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_name_the_last_path_segment_or_the_host() {
        let (name, args) = Presenter::resolve_link("app://menu/settings?tab=audio#volume").unwrap();
        assert_eq!(name, "settings");
        assert_eq!(args.query("tab"), Some("audio"));
        assert_eq!(args.fragment(), Some("volume"));

        let (name, _) = Presenter::resolve_link("app://inventory").unwrap();
        assert_eq!(name, "inventory");

        let (name, _) = Presenter::resolve_link("app://shop/items/").unwrap();
        assert_eq!(name, "items");
    }

    #[test]
    fn malformed_links_are_configuration_errors() {
        let err = Presenter::resolve_link("not a link").unwrap_err();
        assert!(matches!(err, PresentError::InvalidLink { .. }));
        assert!(err.is_configuration());
    }
}
