//! Present/dismiss operations: shared state, queue items and caller handles.
//!
//! ## Contents
//! - [`OperationId`], [`OperationKind`], [`OperationStatus`] operation metadata
//! - [`OperationHandle`], [`PresentHandle`] what callers hold while an operation runs
//!
//! The queue itself lives in the presenter core; this module only describes what
//! flows through it.

mod handle;
mod operation;
mod request;

pub use handle::{OperationHandle, PresentHandle};
pub use operation::{OperationId, OperationKind, OperationStatus};

pub(crate) use operation::OperationState;
pub(crate) use request::{Operation, PresentRequest};
