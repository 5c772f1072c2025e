//! # Presenter configuration.
//!
//! Provides [`PresenterConfig`], the runtime settings of one presenter.
//!
//! ## Sentinel values
//! - `view_timeout = 0s` → no timeout on view acquisition
//! - `queue_capacity` / `bus_capacity` below 1 are clamped to 1

use std::time::Duration;

/// Runtime configuration of a presenter.
///
/// ## Field semantics
/// - `queue_capacity`: pending operations the queue accepts before `present`/`dismiss`
///   fault with `QueueFull`
/// - `bus_capacity`: event bus ring buffer size
/// - `view_timeout`: longest wait for `ViewFactory::create_view` (`0s` = unbounded)
///
/// All fields are public; prefer the accessors to avoid sentinel checks elsewhere.
#[derive(Clone, Debug)]
pub struct PresenterConfig {
    /// Capacity of the operation queue.
    pub queue_capacity: usize,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers that lag behind more than `bus_capacity` events skip older items.
    pub bus_capacity: usize,

    /// View acquisition timeout.
    ///
    /// A present whose view is not ready in time faults with `ViewTimeout`.
    pub view_timeout: Duration,
}

impl PresenterConfig {
    /// View timeout as an `Option` (`None` → wait forever).
    #[inline]
    pub fn view_timeout(&self) -> Option<Duration> {
        if self.view_timeout == Duration::ZERO {
            None
        } else {
            Some(self.view_timeout)
        }
    }

    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }

    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Sets the view timeout.
    pub fn with_view_timeout(mut self, timeout: Duration) -> Self {
        self.view_timeout = timeout;
        self
    }
}

impl Default for PresenterConfig {
    /// - `queue_capacity = 1024`
    /// - `bus_capacity = 1024`
    /// - `view_timeout = 0s` (no timeout)
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            bus_capacity: 1024,
            view_timeout: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_and_clamps() {
        let cfg = PresenterConfig {
            queue_capacity: 0,
            bus_capacity: 0,
            view_timeout: Duration::ZERO,
        };
        assert_eq!(cfg.view_timeout(), None);
        assert_eq!(cfg.queue_capacity_clamped(), 1);
        assert_eq!(cfg.bus_capacity_clamped(), 1);

        let cfg = cfg.with_view_timeout(Duration::from_millis(250));
        assert_eq!(cfg.view_timeout(), Some(Duration::from_millis(250)));
    }
}
