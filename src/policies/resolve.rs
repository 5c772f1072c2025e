//! # Stacking-policy resolution.
//!
//! Turns the requested flags of a present into a [`PolicyPlan`]: the effective flags
//! plus the dismissals that must happen before the new controller is built.
//!
//! ## Rules (in precedence order)
//! 1. `EXCLUSIVE` never combines with `POPUP`; `MODAL` never combines with `EXCLUSIVE`.
//!    Such requests are rejected before anything is queued.
//! 2. `SINGLETON` selects the live instance of the same type for dismissal.
//! 3. `DISMISS_ALL` selects the whole stack, `DISMISS_CURRENT` the top.
//! 4. `CHILD` without a presenting controller is dropped.
//!
//! A node is never selected twice: `DISMISS_ALL` covers the singleton, and a singleton
//! that is also the top is dismissed once.

use std::sync::Arc;

use crate::controllers::{ControllerProxy, ControllerType};
use crate::core::Stack;
use crate::error::PresentError;
use crate::policies::PresentFlags;

/// Dismissals requested by `DISMISS_CURRENT` / `DISMISS_ALL`.
#[derive(Clone)]
pub(crate) enum DismissScope {
    Nothing,
    Current(Arc<ControllerProxy>),
    All,
}

/// Outcome of policy resolution for one present.
#[derive(Clone)]
pub(crate) struct PolicyPlan {
    pub flags: PresentFlags,
    pub singleton: Option<Arc<ControllerProxy>>,
    pub dismiss: DismissScope,
}

/// Rejects forbidden flag combinations.
pub(crate) fn validate(flags: PresentFlags) -> Result<(), PresentError> {
    let reason = if flags.contains(PresentFlags::EXCLUSIVE | PresentFlags::POPUP) {
        "EXCLUSIVE cannot be combined with POPUP"
    } else if flags.contains(PresentFlags::EXCLUSIVE | PresentFlags::MODAL) {
        "MODAL cannot be combined with EXCLUSIVE"
    } else {
        return Ok(());
    };
    Err(PresentError::InvalidFlags { flags, reason })
}

/// Resolves `requested` against the current stack.
pub(crate) fn resolve(
    requested: PresentFlags,
    kind: ControllerType,
    has_parent: bool,
    stack: &Stack,
) -> Result<PolicyPlan, PresentError> {
    validate(requested)?;

    let mut flags = requested;
    if flags.contains(PresentFlags::CHILD) && !has_parent {
        flags = flags.difference(PresentFlags::CHILD);
    }

    let mut singleton = if flags.contains(PresentFlags::SINGLETON) {
        stack.find_live_of_type(kind).cloned()
    } else {
        None
    };

    let dismiss = if flags.contains(PresentFlags::DISMISS_ALL) {
        singleton = None;
        DismissScope::All
    } else if flags.contains(PresentFlags::DISMISS_CURRENT) {
        match stack.peek().filter(|top| top.is_live()) {
            Some(top) => {
                if singleton.as_ref().is_some_and(|s| s.id() == top.id()) {
                    singleton = None;
                }
                DismissScope::Current(Arc::clone(top))
            }
            None => DismissScope::Nothing,
        }
    } else {
        DismissScope::Nothing
    };

    Ok(PolicyPlan {
        flags,
        singleton,
        dismiss,
    })
}
