//! Service storage and management.
//!
//! This module provides the [`Service`] trait, the [`GlobalService`] marker and
//! the [`Services`] container used by the [`Server`](crate::server::Server) to
//! hold subsystem state.
//!
//! # Service Scoping
//!
//! The server keeps two containers:
//!
//! - a **staging** container, mutable while extensions build; registries that
//!   other extensions contribute to live here until they are frozen
//! - a **global** container of [`GlobalService`]s, shared read-only with every
//!   management operation once the server is ready
//!
//! Global services that need to change at runtime (the live security settings
//! of the messaging subsystem, for example) use interior mutability.

use core::any::{Any, TypeId};
use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A value that can be stored in a [`Services`] container.
///
/// Any type that is `Send + Sync + 'static` automatically implements `Service`.
pub trait Service: Send + Sync + 'static {
    /// Returns the type name for debugging purposes.
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl<T: Send + Sync + 'static> Service for T {}

/// Marker trait for services shared with management operations.
///
/// Global services live for the lifetime of the server and are reachable from
/// every operation handler through its operation context.
///
/// ```
/// use mgmt_system::service::GlobalService;
///
/// struct HandlerNames { names: Vec<String> }
/// impl GlobalService for HandlerNames {}
/// ```
pub trait GlobalService: Service {}

/// Unique identifier for a service type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceId(TypeId);

impl ServiceId {
    /// Creates a `ServiceId` for the given type.
    #[must_use]
    pub fn of<T: Service>() -> Self {
        Self(TypeId::of::<T>())
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.0
    }
}

/// Errors that can occur during service access.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The requested service type was not found in the container.
    #[error("service not found: {0}")]
    NotFound(&'static str),

    /// The service is currently borrowed and cannot be accessed this way.
    #[error("service already borrowed: {0}")]
    BorrowConflict(&'static str),
}

struct ServiceEntry {
    data: RwLock<Box<dyn Any + Send + Sync>>,
}

impl ServiceEntry {
    fn new<T: Service>(service: T) -> Self {
        Self {
            data: RwLock::new(Box::new(service)),
        }
    }

    fn into_inner(self) -> Box<dyn Any + Send + Sync> {
        self.data.into_inner()
    }
}

/// Container for storing and managing services.
///
/// Services are accessed through RAII guards. Each service has its own
/// `RwLock`, so readers of one service never block access to another.
///
/// # Example
///
/// ```
/// use mgmt_system::service::Services;
///
/// struct Counter { value: i32 }
///
/// let mut services = Services::new();
/// services.insert(Counter { value: 0 });
///
/// {
///     let mut counter = services.get_mut::<Counter>().unwrap();
///     counter.value += 1;
/// }
///
/// assert_eq!(services.get::<Counter>().unwrap().value, 1);
/// ```
#[derive(Default)]
pub struct Services {
    storage: HashMap<ServiceId, ServiceEntry>,
}

impl core::fmt::Debug for Services {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Services")
            .field("len", &self.storage.len())
            .finish()
    }
}

impl Services {
    /// Creates a new empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: HashMap::new(),
        }
    }

    /// Inserts a service, returning the previous value of the same type.
    pub fn insert<T: Service>(&mut self, service: T) -> Option<T> {
        self.storage
            .insert(ServiceId::of::<T>(), ServiceEntry::new(service))
            .and_then(|old| old.into_inner().downcast::<T>().ok().map(|boxed| *boxed))
    }

    /// Returns `true` if a service of type `T` exists.
    #[must_use]
    pub fn contains<T: Service>(&self) -> bool {
        self.storage.contains_key(&ServiceId::of::<T>())
    }

    /// Gets an immutable reference to a service.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the service type is not registered
    /// - [`ServiceError::BorrowConflict`] if the service is mutably borrowed
    pub fn get<T: Service>(&self) -> Result<ServiceRef<'_, T>, ServiceError> {
        let type_name = core::any::type_name::<T>();
        let entry = self
            .storage
            .get(&ServiceId::of::<T>())
            .ok_or(ServiceError::NotFound(type_name))?;
        let guard = entry
            .data
            .try_read()
            .ok_or(ServiceError::BorrowConflict(type_name))?;

        Ok(ServiceRef {
            guard,
            _marker: core::marker::PhantomData,
        })
    }

    /// Gets a mutable reference to a service.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the service type is not registered
    /// - [`ServiceError::BorrowConflict`] if the service is already borrowed
    pub fn get_mut<T: Service>(&self) -> Result<ServiceRefMut<'_, T>, ServiceError> {
        let type_name = core::any::type_name::<T>();
        let entry = self
            .storage
            .get(&ServiceId::of::<T>())
            .ok_or(ServiceError::NotFound(type_name))?;
        let guard = entry
            .data
            .try_write()
            .ok_or(ServiceError::BorrowConflict(type_name))?;

        Ok(ServiceRefMut {
            guard,
            _marker: core::marker::PhantomData,
        })
    }

    /// Removes a service and returns it.
    pub fn remove<T: Service>(&mut self) -> Option<T> {
        self.storage
            .remove(&ServiceId::of::<T>())
            .and_then(|entry| entry.into_inner().downcast::<T>().ok().map(|boxed| *boxed))
    }

    /// Returns the number of services stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if no services are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

/// RAII guard for immutable service access.
pub struct ServiceRef<'a, T: Service> {
    guard: RwLockReadGuard<'a, Box<dyn Any + Send + Sync>>,
    _marker: core::marker::PhantomData<&'a T>,
}

impl<T: Service> core::ops::Deref for ServiceRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        // The entry was keyed by ServiceId::of::<T>(), so the downcast holds.
        self.guard
            .downcast_ref::<T>()
            .expect("service type mismatch (this is a bug)")
    }
}

/// RAII guard for mutable service access.
pub struct ServiceRefMut<'a, T: Service> {
    guard: RwLockWriteGuard<'a, Box<dyn Any + Send + Sync>>,
    _marker: core::marker::PhantomData<&'a mut T>,
}

impl<T: Service> core::ops::Deref for ServiceRefMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.guard
            .downcast_ref::<T>()
            .expect("service type mismatch (this is a bug)")
    }
}

impl<T: Service> core::ops::DerefMut for ServiceRefMut<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.guard
            .downcast_mut::<T>()
            .expect("service type mismatch (this is a bug)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Counter {
        value: i32,
    }

    #[derive(Debug, PartialEq)]
    struct Name(String);

    #[test]
    fn insert_and_get() {
        let mut services = Services::new();
        services.insert(Counter { value: 42 });

        assert_eq!(services.get::<Counter>().unwrap().value, 42);
    }

    #[test]
    fn insert_replaces_existing() {
        let mut services = Services::new();
        services.insert(Counter { value: 1 });

        let old = services.insert(Counter { value: 2 });
        assert_eq!(old, Some(Counter { value: 1 }));
        assert_eq!(services.get::<Counter>().unwrap().value, 2);
    }

    #[test]
    fn mutable_borrow_blocks_immutable() {
        let mut services = Services::new();
        services.insert(Counter { value: 42 });

        let _borrow_mut = services.get_mut::<Counter>().unwrap();
        assert!(matches!(
            services.get::<Counter>(),
            Err(ServiceError::BorrowConflict(_))
        ));
    }

    #[test]
    fn missing_service_is_not_found() {
        let services = Services::new();
        assert!(matches!(
            services.get::<Counter>(),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn remove_returns_service() {
        let mut services = Services::new();
        services.insert(Counter { value: 7 });
        services.insert(Name("role".to_string()));

        assert_eq!(services.remove::<Counter>(), Some(Counter { value: 7 }));
        assert!(!services.contains::<Counter>());
        assert_eq!(services.len(), 1);
    }
}
