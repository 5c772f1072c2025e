//! # Service resolution for controller constructors.
//!
//! [`ServiceProvider`] is the dependency-injection seam: the presenter never builds
//! services itself, it only asks the provider by [`TypeId`]. Controllers see the
//! provider through a typed [`Resolver`].
//!
//! [`ServiceCollection`] is a ready-made provider backed by a map of shared instances.
//!
//! A controller type lists the services it cannot live without as [`Dependency`]s in
//! [`Presentable::REQUIRES`](crate::Presentable::REQUIRES); the presenter checks them
//! before queueing the present, so a missing one never costs a stack change.
//!
//! ## Example
//! ```
//! use std::sync::Arc;
//! use viewvisor::{Resolver, ServiceCollection};
//!
//! struct Settings { volume: u8 }
//!
//! let services = ServiceCollection::new().with(Settings { volume: 7 });
//! let resolver = Resolver::new(&services);
//! let settings: Arc<Settings> = resolver.get().unwrap();
//! assert_eq!(settings.volume, 7);
//! assert!(resolver.get::<String>().is_err());
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ControllerError;

/// Shared, type-erased service instance.
pub type ServiceRef = Arc<dyn Any + Send + Sync>;

/// Source of constructor dependencies.
///
/// `None` means "unresolved"; the presenter turns it into a configuration error.
pub trait ServiceProvider: Send + Sync + 'static {
    fn resolve(&self, ty: TypeId) -> Option<ServiceRef>;
}

/// Typed view over a [`ServiceProvider`].
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    provider: &'a dyn ServiceProvider,
}

impl<'a> Resolver<'a> {
    pub fn new(provider: &'a dyn ServiceProvider) -> Self {
        Self { provider }
    }

    /// Resolves a required service.
    pub fn get<T: Any + Send + Sync>(&self) -> Result<Arc<T>, ControllerError> {
        self.try_get::<T>().ok_or(ControllerError::Unresolved {
            service: std::any::type_name::<T>(),
        })
    }

    /// Fails with the first dependency the provider cannot resolve.
    pub fn require(&self, deps: &[Dependency]) -> Result<(), ControllerError> {
        match deps.iter().find(|d| self.provider.resolve(Dependency::type_id(d)).is_none()) {
            Some(missing) => Err(ControllerError::Unresolved {
                service: missing.type_name(),
            }),
            None => Ok(()),
        }
    }

    /// Resolves an optional service.
    pub fn try_get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.provider
            .resolve(TypeId::of::<T>())
            .and_then(|s| s.downcast::<T>().ok())
    }
}

/// A service type, named ahead of construction.
///
/// ```
/// use viewvisor::Dependency;
///
/// struct Clock;
/// const NEEDS: &[Dependency] = &[Dependency::of::<Clock>()];
/// assert!(NEEDS[0].type_name().ends_with("Clock"));
/// ```
#[derive(Clone, Copy)]
pub struct Dependency {
    id: fn() -> TypeId,
    name: fn() -> &'static str,
}

impl Dependency {
    pub const fn of<T: Any + Send + Sync>() -> Self {
        Self {
            id: TypeId::of::<T>,
            name: std::any::type_name::<T>,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        (self.id)()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.name)()
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Map-backed [`ServiceProvider`].
#[derive(Clone, Default)]
pub struct ServiceCollection {
    services: HashMap<TypeId, ServiceRef>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an owned instance.
    pub fn with<T: Any + Send + Sync>(self, service: T) -> Self {
        self.with_arc(Arc::new(service))
    }

    /// Registers an already shared instance.
    pub fn with_arc<T: Any + Send + Sync>(mut self, service: Arc<T>) -> Self {
        self.services.insert(TypeId::of::<T>(), service);
        self
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceProvider for ServiceCollection {
    fn resolve(&self, ty: TypeId) -> Option<ServiceRef> {
        self.services.get(&ty).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_service_names_the_type() {
        let services = ServiceCollection::new();
        let err = Resolver::new(&services).get::<u64>().unwrap_err();
        match err {
            ControllerError::Unresolved { service } => assert_eq!(service, "u64"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn shared_instances_are_returned_as_is() {
        let shared = Arc::new(String::from("theme"));
        let services = ServiceCollection::new().with_arc(Arc::clone(&shared));
        let got = Resolver::new(&services).get::<String>().unwrap();
        assert!(Arc::ptr_eq(&shared, &got));
        assert_eq!(services.len(), 1);
    }

    #[test]
    fn require_reports_the_first_missing_dependency() {
        struct Clock;
        let services = ServiceCollection::new().with(7_u32);
        let resolver = Resolver::new(&services);

        assert!(resolver.require(&[Dependency::of::<u32>()]).is_ok());
        match resolver.require(&[Dependency::of::<u32>(), Dependency::of::<Clock>()]) {
            Err(ControllerError::Unresolved { service }) => assert!(service.ends_with("Clock")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
