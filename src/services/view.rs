//! # View factory contract.
//!
//! The presenter does not know how views are drawn. It asks a [`ViewFactory`] for a
//! view when a controller is presented and hands it back when the controller is
//! disposed. Views are opaque to the presenter ([`ViewRef`]); controllers downcast
//! them through [`ControllerContext::view_as`](crate::ControllerContext::view_as).
//!
//! ## Rules
//! - `create_view` reports failures through its result; a failure faults the present
//!   operation and nothing is pushed.
//! - `release_view` is best effort: errors and panics are reported on the event bus and
//!   never stop the rest of a teardown.
//! - A view talks back to its controller through the [`CommandSink`] in its request.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use async_trait::async_trait;

use crate::controllers::{Command, ControllerId, ControllerType};
use crate::core::Presenter;
use crate::error::ViewError;
use crate::policies::PresentFlags;

/// Opaque, shared view handle.
pub type ViewRef = Arc<dyn Any + Send + Sync>;

/// Everything a view factory needs to instantiate one view.
#[derive(Clone, Debug)]
pub struct ViewRequest {
    /// Controller type the view is for.
    pub controller: ControllerType,
    /// Controller instance id.
    pub controller_id: ControllerId,
    /// Position the controller will take on the stack (0 = bottom).
    pub z_order: usize,
    /// Effective stacking flags.
    pub flags: PresentFlags,
    /// Parent-slot hint from the present args.
    pub parent_slot: Option<Arc<str>>,
    /// Channel for commands raised by the view.
    pub commands: CommandSink,
}

/// Produces and releases views.
#[async_trait]
pub trait ViewFactory: Send + Sync + 'static {
    /// Creates the view for a controller that is being presented.
    async fn create_view(&self, request: ViewRequest) -> Result<ViewRef, ViewError>;

    /// Releases a view whose controller is being disposed.
    fn release_view(&self, view: ViewRef) -> Result<(), ViewError> {
        drop(view);
        Ok(())
    }
}

/// Command entry point handed to a view.
///
/// Commands sent here are offered to the view's own controller first and bubble
/// down the stack from there.
#[derive(Clone)]
pub struct CommandSink {
    presenter: Weak<Presenter>,
    controller: ControllerId,
}

impl CommandSink {
    pub(crate) fn new(presenter: Weak<Presenter>, controller: ControllerId) -> Self {
        Self {
            presenter,
            controller,
        }
    }

    /// Routes a command; returns `true` if some controller handled it.
    pub fn send(&self, command: impl Into<Command>) -> bool {
        let command = command.into();
        match self.presenter.upgrade() {
            Some(p) => p.dispatch_from(self.controller, &command),
            None => false,
        }
    }

    /// Controller this sink feeds.
    pub fn controller(&self) -> ControllerId {
        self.controller
    }
}

impl fmt::Debug for CommandSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSink")
            .field("controller", &self.controller)
            .finish()
    }
}
