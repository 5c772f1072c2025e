//! # Controller abstractions.
//!
//! A controller is plain user code bound to one view. The crate asks very little of it:
//!
//! - [`Controller`]: object-safe behaviour (command handling, optional events);
//! - [`ControllerEvents`]: optional lifecycle hooks, exposed through
//!   [`Controller::events`] rather than through a base type;
//! - [`Presentable`]: how the presenter builds the controller and which stacking
//!   flags its type always carries.
//!
//! A minimal controller only needs a constructor:
//! ```
//! use viewvisor::{Controller, ControllerContext, ControllerError, Presentable, Resolver};
//!
//! struct Minimal;
//!
//! impl Controller for Minimal {}
//!
//! impl Presentable for Minimal {
//!     fn create(_ctx: ControllerContext, _services: &Resolver<'_>) -> Result<Self, ControllerError> {
//!         Ok(Minimal)
//!     }
//! }
//! ```

use std::any::{Any, TypeId};
use std::fmt;

use crate::controllers::{Command, ControllerContext};
use crate::error::ControllerError;
use crate::policies::PresentFlags;
use crate::services::{Dependency, Resolver};

/// Behaviour of a presented controller.
pub trait Controller: Send + 'static {
    /// Offers a command to the controller; return `true` when handled.
    ///
    /// Unhandled commands bubble to the controller below unless this one is modal
    /// or exclusive.
    fn handle_command(&mut self, command: &Command) -> bool {
        let _ = command;
        false
    }

    /// Exposes lifecycle hooks, if the controller has any.
    fn events(&mut self) -> Option<&mut dyn ControllerEvents> {
        None
    }
}

/// Optional lifecycle hooks.
///
/// - `on_present` fires once, after the view is ready and the controller is on the stack.
/// - `on_activate` / `on_deactivate` fire each time the controller becomes / stops being the
///   effective top.
/// - `on_dismiss` fires once, right before the controller and its view are disposed.
///
/// Errors from `on_present` and `on_dismiss` fault the running operation (the controller is
/// still torn down). Errors from `on_activate` and `on_deactivate` are reported only.
pub trait ControllerEvents {
    fn on_present(&mut self) -> Result<(), ControllerError> {
        Ok(())
    }

    fn on_activate(&mut self) -> Result<(), ControllerError> {
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<(), ControllerError> {
        Ok(())
    }

    fn on_dismiss(&mut self) -> Result<(), ControllerError> {
        Ok(())
    }
}

/// A controller type the presenter can build.
pub trait Presentable: Controller + Sized {
    /// Stacking flags every instance of this type carries.
    const FLAGS: PresentFlags = PresentFlags::NONE;

    /// Services [`create`](Self::create) cannot do without.
    ///
    /// They are checked when the present is requested: if one is missing the handle
    /// faults with `Unresolved` and the stack is left untouched.
    const REQUIRES: &'static [Dependency] = &[];

    /// Builds the controller.
    ///
    /// Dependencies are taken from `services`; a missing one should be reported with
    /// `services.get::<T>()?` so the presenter can surface it as a configuration error.
    /// Only services listed in [`REQUIRES`](Self::REQUIRES) are guaranteed to be checked
    /// before any policy dismissal runs.
    fn create(ctx: ControllerContext, services: &Resolver<'_>) -> Result<Self, ControllerError>;
}

/// Identity of a controller instance, unique within one presenter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(pub(crate) u64);

impl ControllerId {
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Identity of a controller type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerType {
    id: TypeId,
    name: &'static str,
}

impl ControllerType {
    pub fn of<C: 'static>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
        }
    }

    /// Full type name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path.
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl fmt::Debug for ControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Type-erased controller as stored by a proxy.
pub(crate) trait AnyController: Send {
    fn controller(&mut self) -> &mut dyn Controller;
    fn as_any(&mut self) -> &mut dyn Any;
}

impl<C: Controller> AnyController for C {
    fn controller(&mut self) -> &mut dyn Controller {
        self
    }

    fn as_any(&mut self) -> &mut dyn Any {
        self
    }
}

pub(crate) type CreateFn =
    fn(ControllerContext, &Resolver<'_>) -> Result<Box<dyn AnyController>, ControllerError>;

fn create_boxed<C: Presentable>(
    ctx: ControllerContext,
    services: &Resolver<'_>,
) -> Result<Box<dyn AnyController>, ControllerError> {
    C::create(ctx, services).map(|c| Box::new(c) as Box<dyn AnyController>)
}

/// Everything needed to build one controller type.
#[derive(Clone, Copy)]
pub(crate) struct Blueprint {
    pub kind: ControllerType,
    pub flags: PresentFlags,
    pub requires: &'static [Dependency],
    pub create: CreateFn,
}

impl Blueprint {
    pub fn of<C: Presentable>() -> Self {
        Self {
            kind: ControllerType::of::<C>(),
            flags: C::FLAGS,
            requires: C::REQUIRES,
            create: create_boxed::<C>,
        }
    }
}

impl fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blueprint")
            .field("kind", &self.kind)
            .field("flags", &self.flags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    mod screens {
        pub struct Inventory;
        pub struct Generic<T>(pub T);
    }

    #[test]
    fn short_name_strips_paths_and_generics() {
        assert_eq!(ControllerType::of::<screens::Inventory>().short_name(), "Inventory");
        assert_eq!(ControllerType::of::<screens::Generic<u8>>().short_name(), "Generic");
    }

    #[test]
    fn controller_id_display() {
        assert_eq!(ControllerId(7).to_string(), "c7");
        assert_eq!(ControllerId(7).get(), 7);
    }
}
