//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] fan-out that
//! feeds presenter events to user observers.
//!
//! ## Architecture
//! ```text
//! operation loop ── publish(Event) ──► Bus ──► subscriber listener
//!                                                   │
//!                                                   ▼
//!                                             SubscriberSet::emit
//!                                    ┌──────────────┼──────────────┐
//!                                    ▼              ▼              ▼
//!                                LogWriter    ErrorReporter      Custom
//! ```
//!
//! [`LogWriter`] is available with the `logging` feature.

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
