//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for observing a presenter: error
//! reporting, analytics, UI tooling.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and reported as `EventKind::SubscriberPanicked`)
//!
//! ## Rules
//! - A slow subscriber only affects its own queue; it never delays the operation loop.
//! - Queue overflow drops the event **for this subscriber only** and publishes
//!   `EventKind::SubscriberOverflow`.
//! - Events are processed sequentially (FIFO) per subscriber.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use viewvisor::{Event, EventKind, Subscribe};
//!
//! struct ErrorReporter;
//!
//! #[async_trait]
//! impl Subscribe for ErrorReporter {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::CallbackFailed | EventKind::OperationFaulted) {
//!             // forward to the crash reporter
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "error-reporter" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Presenter event subscriber.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, never from the operation loop.
    async fn on_event(&self, event: &Event);

    /// Name used in overflow/panic events.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue (minimum 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
