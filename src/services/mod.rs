//! External collaborators: dependency resolution and view creation.
//!
//! ## Contents
//! - [`ServiceProvider`], [`Resolver`], [`ServiceCollection`], [`Dependency`] constructor dependencies
//! - [`ViewFactory`], [`ViewRequest`], [`ViewRef`], [`CommandSink`] view creation and release

mod provider;
mod view;

pub use provider::{Dependency, Resolver, ServiceCollection, ServiceProvider, ServiceRef};
pub use view::{CommandSink, ViewFactory, ViewRef, ViewRequest};
