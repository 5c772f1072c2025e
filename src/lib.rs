//! # viewvisor
//!
//! **Viewvisor** orchestrates a stack of view controllers.
//!
//! Each controller is bound to a view produced by an external [`ViewFactory`]. The
//! presenter creates, activates, routes commands to and tears down controllers through
//! a queue of asynchronous operations, so the stack is never observed half-mutated.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   present::<C>(args)      dismiss(ref)      dismiss_all()      dispatch(cmd)
//!          │                     │                  │                  │
//!          ▼                     ▼                  ▼                  │
//! ┌─────────────────────────────────────────────────────────┐          │
//! │  Presenter                                              │          │
//! │  - operation queue (bounded mpsc, one consumer)         │          │
//! │  - Stack of ControllerProxy (bottom → top)              │◄─────────┘
//! │  - policy resolution (exclusive/modal/singleton/child)  │   top-down walk,
//! │  - Bus (broadcast events)                               │   stops at modal
//! └──────┬──────────────────────────────┬───────────────────┘
//!        │ create / release view        │ resolve services
//!        ▼                              ▼
//!   ViewFactory (external)        ServiceProvider (external)
//!
//! Bus ──► subscriber listener ──► SubscriberSet ──► worker per Subscribe impl
//! ```
//!
//! ### Lifecycle of one controller
//! ```text
//! Constructing ──► Presenting ──► Inactive ◄──► Active ──► Dismissing ──► Disposed
//!   create()        create_view()   on_present    on_activate   on_dismiss     release_view()
//!                                                 on_deactivate
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                                  |
//! |-------------------|-----------------------------------------------------------------|-----------------------------------------------------|
//! | **Controllers**   | User behaviour, optional hooks, construction with services.     | [`Controller`], [`ControllerEvents`], [`Presentable`] |
//! | **Presenting**    | Queue presents/dismisses and observe them through handles.      | [`Presenter`], [`PresentHandle`], [`OperationHandle`] |
//! | **Policies**      | Exclusive, popup, modal, singleton, child, dismiss-current/all. | [`PresentFlags`]                                    |
//! | **Commands**      | Tokens bubbling from views down the stack.                      | [`Command`], [`CommandSink`]                        |
//! | **Deep links**    | Present registered controllers by name or URL.                  | [`ControllerRegistry`], [`Presenter::open`]         |
//! | **Subscriber API**| Hook into every lifecycle step (logging, error reporting).      | [`Subscribe`], [`Event`]                            |
//! | **Errors**        | Typed faults for operations and user code.                      | [`PresentError`], [`ControllerError`], [`ViewError`] |
//! | **Configuration** | Queue/bus capacity, view timeout.                               | [`PresenterConfig`]                                 |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber that renders events with `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use viewvisor::{
//!     Controller, ControllerContext, ControllerError, PresentArgs, Presentable,
//!     PresenterBuilder, PresenterConfig, Resolver, ViewError, ViewFactory, ViewRef, ViewRequest,
//! };
//!
//! struct Views;
//!
//! #[async_trait]
//! impl ViewFactory for Views {
//!     async fn create_view(&self, request: ViewRequest) -> Result<ViewRef, ViewError> {
//!         Ok(Arc::new(format!("view for {:?}", request.controller)))
//!     }
//! }
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
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let presenter = PresenterBuilder::new(PresenterConfig::default(), Arc::new(Views)).build();
//!
//!     let handle = presenter.present::<Minimal>(PresentArgs::new());
//!     let controller = handle.wait().await?;
//!     assert!(controller.is_active());
//!     assert_eq!(presenter.len(), 1);
//!
//!     handle.dismiss().wait().await?;
//!     assert!(handle.is_dismissed());
//!     assert!(presenter.is_empty());
//!
//!     presenter.shutdown().await;
//!     Ok(())
//! }
//! ```
mod controllers;
mod core;
mod error;
mod events;
mod operations;
mod policies;
mod services;
mod subscribers;
mod sync;

// ---- Public re-exports ----

pub use controllers::{
    Command, CommandId, Controller, ControllerContext, ControllerEvents, ControllerId,
    ControllerRef, ControllerRegistry, ControllerState, ControllerType, PresentArgs, Presentable,
};
pub use core::{Presenter, PresenterBuilder, PresenterConfig};
pub use error::{ControllerError, PresentError, ViewError};
pub use events::{Bus, Event, EventKind};
pub use operations::{OperationHandle, OperationId, OperationKind, OperationStatus, PresentHandle};
pub use policies::PresentFlags;
pub use services::{
    CommandSink, Dependency, Resolver, ServiceCollection, ServiceProvider, ServiceRef, ViewFactory, ViewRef,
    ViewRequest,
};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: a subscriber that renders events through `tracing`.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
