//! Stacking policies.
//!
//! This module groups the knobs that control **where** a controller lands on the stack
//! and **what** has to leave the stack before it does.
//!
//! ## Contents
//! - [`PresentFlags`] the flag set (exclusive / popup / modal / singleton / child / ...)
//! - `resolve` turns requested flags into the dismissals a present performs first
//!
//! ## Quick wiring
//! ```text
//! present(C, args)
//!   └─► flags = C::FLAGS | args.flags()
//!        ├─► validate(flags)           rejected synchronously when forbidden
//!        └─► resolve(flags, stack)     inside the operation loop
//!             └─► PolicyPlan { flags, singleton, dismiss }
//! ```

mod flags;
mod resolve;

pub use flags::PresentFlags;

pub(crate) use resolve::{DismissScope, resolve, validate};
