//! Presenter core: stack, operation loop and lifecycle orchestration.
//!
//! The public API of this module is [`Presenter`], built with [`PresenterBuilder`] and
//! configured with [`PresenterConfig`].
//!
//! Internal modules:
//! - [`stack`]: the ordered node list and its scans (children, singletons);
//! - [`runtime`]: the operation loop that serializes every stack mutation;
//! - [`present`] / [`dismiss`]: the two operation algorithms;
//! - [`activation`]: keeps exactly the right controller active;
//! - [`routing`]: command bubbling.
//!
//! ```text
//! PresenterBuilder::build()
//!   ├─► Bus::new(bus_capacity)
//!   ├─► SubscriberSet + subscriber listener      (only with subscribers)
//!   ├─► Arc<Presenter>                           (holds the queue sender and the stack)
//!   └─► OperationLoop::spawn()                   (holds the queue receiver)
//! ```

mod activation;
mod builder;
mod config;
mod dismiss;
mod present;
mod presenter;
mod routing;
mod runtime;
mod stack;

pub use builder::PresenterBuilder;
pub use config::PresenterConfig;
pub use presenter::Presenter;

pub(crate) use stack::Stack;
