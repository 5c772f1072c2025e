//! # Controller-side types.
//!
//! This module provides everything user code touches when writing a controller:
//! - [`Controller`], [`ControllerEvents`], [`Presentable`] - behaviour, hooks, construction
//! - [`ControllerContext`] - what a controller may do with its own presentation
//! - [`PresentArgs`] - immutable presentation parameters
//! - [`Command`] / [`CommandId`] - tokens exchanged between views and controllers
//! - [`ControllerRef`] - caller-side reference to a presented controller
//! - [`ControllerRegistry`] - name → type bindings for named presents and deep links
//!
//! The stack node itself ([`ControllerProxy`]) stays internal.

mod args;
mod command;
mod context;
mod controller;
mod proxy;
mod reference;
mod registry;

pub use args::PresentArgs;
pub use command::{Command, CommandId};
pub use context::ControllerContext;
pub use controller::{Controller, ControllerEvents, ControllerId, ControllerType, Presentable};
pub use proxy::ControllerState;
pub use reference::ControllerRef;
pub use registry::ControllerRegistry;

pub(crate) use controller::Blueprint;
pub(crate) use proxy::{ControllerProxy, Hook};
