//! Error types used by the presenter runtime and by controller code.
//!
//! This module defines three error enums:
//!
//! - [`PresentError`] - faults of present/dismiss operations, delivered to handles.
//! - [`ControllerError`] - errors raised by user controllers (constructors and hooks).
//! - [`ViewError`] - errors raised by a [`ViewFactory`](crate::ViewFactory).
//!
//! [`PresentError`] provides helper methods (`as_label`, `as_message`) for logging
//! and [`PresentError::is_configuration`] to tell setup mistakes from runtime faults.

use std::any::Any;
use std::time::Duration;

use thiserror::Error;

use crate::policies::PresentFlags;

/// # Faults of present/dismiss operations.
///
/// Configuration errors are raised before the stack is touched. Every other
/// variant is raised while an operation runs and leaves already committed
/// stack changes in place.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresentError {
    /// Requested stacking flags cannot be combined.
    #[error("invalid present flags {flags:?}: {reason}")]
    InvalidFlags {
        /// The offending combination.
        flags: PresentFlags,
        /// Which rule was violated.
        reason: &'static str,
    },

    /// No controller is registered under the requested name.
    #[error("no controller registered as '{name}'")]
    NotRegistered {
        /// Requested name.
        name: String,
    },

    /// Deep link could not be parsed.
    #[error("invalid link '{link}': {reason}")]
    InvalidLink {
        /// The raw link.
        link: String,
        /// Parser message.
        reason: String,
    },

    /// A constructor dependency could not be resolved from the service provider.
    #[error("controller {controller}: unresolved dependency {service}")]
    Unresolved {
        /// Controller type name.
        controller: &'static str,
        /// Service type name.
        service: &'static str,
    },

    /// Controller constructor failed.
    #[error("controller {controller}: construction failed: {error}")]
    Construction {
        /// Controller type name.
        controller: &'static str,
        /// Underlying message.
        error: String,
    },

    /// View factory failed to produce a view.
    #[error("controller {controller}: view load failed: {error}")]
    ViewLoad {
        /// Controller type name.
        controller: &'static str,
        /// Underlying message.
        error: String,
    },

    /// View factory did not answer within the configured timeout.
    #[error("controller {controller}: view load timed out after {timeout:?}")]
    ViewTimeout {
        /// Controller type name.
        controller: &'static str,
        /// Configured timeout.
        timeout: Duration,
    },

    /// A lifecycle hook returned an error or panicked.
    #[error("controller {controller}: {hook} failed: {error}")]
    Callback {
        /// Controller type name.
        controller: &'static str,
        /// Hook name (`on_present`, `on_activate`, ...).
        hook: &'static str,
        /// Underlying message.
        error: String,
    },

    /// The presenting parent was dismissed before this child could be pushed.
    #[error("controller {controller}: parent dismissed before present")]
    ParentDismissed {
        /// Controller type name.
        controller: &'static str,
    },

    /// A running operation was canceled after it started mutating the stack.
    #[error("controller {controller}: interrupted while presenting")]
    Interrupted {
        /// Controller type name.
        controller: &'static str,
    },

    /// Operation was canceled before it started.
    #[error("operation canceled")]
    Canceled,

    /// Operation queue is full.
    #[error("operation queue full")]
    QueueFull,

    /// Presenter is shut down.
    #[error("presenter closed")]
    Closed,
}

impl PresentError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use viewvisor::PresentError;
    ///
    /// assert_eq!(PresentError::QueueFull.as_label(), "present_queue_full");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PresentError::InvalidFlags { .. } => "present_invalid_flags",
            PresentError::NotRegistered { .. } => "present_not_registered",
            PresentError::InvalidLink { .. } => "present_invalid_link",
            PresentError::Unresolved { .. } => "present_unresolved",
            PresentError::Construction { .. } => "present_construction",
            PresentError::ViewLoad { .. } => "present_view_load",
            PresentError::ViewTimeout { .. } => "present_view_timeout",
            PresentError::Callback { .. } => "present_callback",
            PresentError::ParentDismissed { .. } => "present_parent_dismissed",
            PresentError::Interrupted { .. } => "present_interrupted",
            PresentError::Canceled => "present_canceled",
            PresentError::QueueFull => "present_queue_full",
            PresentError::Closed => "present_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PresentError::InvalidFlags { flags, reason } => {
                format!("flags={flags:?} rejected: {reason}")
            }
            PresentError::NotRegistered { name } => format!("unknown controller name={name}"),
            PresentError::InvalidLink { link, reason } => format!("link={link} error: {reason}"),
            PresentError::Unresolved { controller, service } => {
                format!("{controller} needs {service}")
            }
            PresentError::Construction { controller, error } => format!("{controller}: {error}"),
            PresentError::ViewLoad { controller, error } => format!("{controller}: {error}"),
            PresentError::ViewTimeout {
                controller,
                timeout,
            } => format!("{controller}: timeout {timeout:?}"),
            PresentError::Callback {
                controller,
                hook,
                error,
            } => format!("{controller}.{hook}: {error}"),
            PresentError::ParentDismissed { controller } => {
                format!("{controller}: parent gone")
            }
            PresentError::Interrupted { controller } => format!("{controller}: interrupted"),
            PresentError::Canceled => "operation canceled".to_string(),
            PresentError::QueueFull => "operation queue full".to_string(),
            PresentError::Closed => "presenter closed".to_string(),
        }
    }

    /// Indicates a setup mistake rather than a runtime fault.
    ///
    /// # Example
    /// ```
    /// use viewvisor::PresentError;
    ///
    /// let err = PresentError::NotRegistered { name: "settings".into() };
    /// assert!(err.is_configuration());
    /// assert!(!PresentError::Closed.is_configuration());
    /// ```
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PresentError::InvalidFlags { .. }
                | PresentError::NotRegistered { .. }
                | PresentError::InvalidLink { .. }
                | PresentError::Unresolved { .. }
        )
    }
}

/// # Errors raised by controller code.
///
/// Returned from [`Presentable::create`](crate::Presentable::create) and from
/// [`ControllerEvents`](crate::ControllerEvents) hooks.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ControllerError {
    /// Generic failure with a message.
    #[error("{error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// A required service is missing from the provider.
    #[error("unresolved service {service}")]
    Unresolved {
        /// Service type name.
        service: &'static str,
    },
}

impl ControllerError {
    /// Shorthand for [`ControllerError::Fail`].
    pub fn fail(error: impl std::fmt::Display) -> Self {
        ControllerError::Fail {
            error: error.to_string(),
        }
    }
}

impl From<anyhow::Error> for ControllerError {
    fn from(e: anyhow::Error) -> Self {
        ControllerError::Fail {
            error: format!("{e:#}"),
        }
    }
}

/// # Errors raised by a view factory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The view asset could not be found or instantiated.
    #[error("view load failed: {0}")]
    Load(String),

    /// The view could not be released cleanly.
    #[error("view release failed: {0}")]
    Release(String),
}

/// Extracts a readable message from a caught panic payload.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_flagged() {
        let flags = PresentFlags::EXCLUSIVE | PresentFlags::POPUP;
        let err = PresentError::InvalidFlags {
            flags,
            reason: "exclusive and popup are mutually exclusive",
        };
        assert!(err.is_configuration());
        assert_eq!(err.as_label(), "present_invalid_flags");

        let err = PresentError::Callback {
            controller: "Menu",
            hook: "on_present",
            error: "boom".into(),
        };
        assert!(!err.is_configuration());
        assert_eq!(err.as_message(), "Menu.on_present: boom");
    }

    #[test]
    fn controller_error_from_anyhow_keeps_context() {
        let err: ControllerError = anyhow::anyhow!("disk").context("loading save").into();
        assert_eq!(err.to_string(), "loading save: disk");
    }

    #[test]
    fn panic_message_downcasts_common_payloads() {
        let p: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(p.as_ref()), "static");
        let p: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(p.as_ref()), "owned");
        let p: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(p.as_ref()), "unknown panic");
    }
}
