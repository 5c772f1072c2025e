//! Presenter events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to publish and
//! subscribe to everything the presenter does.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the operation loop, command routing, `SubscriberSet` workers
//!   (overflow/panic).
//! - **Consumers**: the subscriber listener spawned by the builder (fans out to
//!   `SubscriberSet`) and any receiver from `Presenter::subscribe()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
