//! Queued operation requests (the items of the operation queue).

use std::sync::{Arc, Weak};

use crate::controllers::{Blueprint, ControllerProxy, PresentArgs};
use crate::operations::operation::OperationState;
use crate::policies::PresentFlags;

/// One item of the operation queue.
pub(crate) enum Operation {
    Present(PresentRequest),
    Dismiss {
        state: Arc<OperationState>,
        target: Arc<ControllerProxy>,
    },
    DismissAll {
        state: Arc<OperationState>,
    },
}

impl Operation {
    pub fn state(&self) -> &Arc<OperationState> {
        match self {
            Operation::Present(req) => &req.state,
            Operation::Dismiss { state, .. } | Operation::DismissAll { state } => state,
        }
    }
}

/// Everything the present algorithm needs.
pub(crate) struct PresentRequest {
    pub state: Arc<OperationState>,
    pub blueprint: Blueprint,
    pub args: PresentArgs,
    /// Type flags OR-ed with caller flags, already validated.
    pub flags: PresentFlags,
    /// Presenting controller; `Some` even if it has died since the request was made.
    pub parent: Option<Weak<ControllerProxy>>,
}
