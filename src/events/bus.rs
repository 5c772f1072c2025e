//! # Event bus for broadcasting presenter events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that stamps every
//! published event with a sequence number and fans it out to receivers.
//!
//! ## Architecture
//! ```text
//! Publishers:                          Subscribers:
//!   operation loop ──┐
//!   command routing ─┼──► Bus ──┬──► subscriber listener ──► SubscriberSet
//!   subscriber set ──┘          └──► Presenter::subscribe() receivers
//! ```
//!
//! ## Rules
//! - `publish()` never blocks.
//! - A single ring buffer of `capacity` events is shared by all receivers; slow
//!   receivers observe `RecvError::Lagged(n)` and skip the `n` oldest items.
//! - Events published while nobody listens are lost.
//! - Sequence numbers belong to the bus instance, not to the process.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for presenter events.
///
/// Cheap to clone; clones share the channel and the sequence counter.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
    seq: Arc<AtomicU64>,
}

impl Bus {
    /// Creates a new bus; the capacity is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self {
            tx,
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Stamps `ev` with the next sequence number and sends it to all receivers.
    pub fn publish(&self, mut ev: Event) {
        ev.seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver that observes events sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
