//! Service registry.
//!
//! # Design
//! A service is a domain-specific extension bound to a client: it receives
//! a `ClientHandle` when registered and issues its requests through it.
//! The handle exposes only the request pipeline, so a service never needs
//! to know the concrete client type and the registry never forms an
//! ownership cycle with the services it holds.
//!
//! Names are unique; registering a name again replaces the earlier entry.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::client::ClientHandle;
use crate::error::ApiError;

/// Upcast helper so registered services can be recovered by concrete type.
/// Implemented for every `'static + Send + Sync` type.
pub trait AsAny: Any + Send + Sync {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A component that issues requests through a client's pipeline.
pub trait Service: AsAny {
    /// Called once on registration with the owning client's handle.
    fn bind(&mut self, client: ClientHandle);
}

/// Name → service map owned by a `Client`.
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<String, Arc<dyn Service>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `service` under `name`, replacing any previous entry.
    pub fn set(&mut self, name: &str, service: Arc<dyn Service>) {
        if self.services.insert(name.to_string(), service).is_some() {
            tracing::debug!(service = name, "replaced registered service");
        } else {
            tracing::debug!(service = name, "registered service");
        }
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Service>, ApiError> {
        self.services
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(name.to_string()))
    }

    /// Look up `name` and recover its concrete type. A service registered
    /// under `name` with a different type counts as missing.
    pub fn get_as<S: Service>(&self, name: &str) -> Result<Arc<S>, ApiError> {
        let service = self.get(name)?;
        AsAny::into_any(service)
            .downcast::<S>()
            .map_err(|_| ApiError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Service>> {
        self.services.remove(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy {
        id: u32,
    }

    impl Service for Dummy {
        fn bind(&mut self, _client: ClientHandle) {}
    }

    struct Other;

    impl Service for Other {
        fn bind(&mut self, _client: ClientHandle) {}
    }

    #[test]
    fn get_returns_the_registered_instance() {
        let mut registry = ServiceRegistry::new();
        let service: Arc<dyn Service> = Arc::new(Dummy { id: 1 });
        registry.set("dummy", Arc::clone(&service));
        let fetched = registry.get("dummy").unwrap();
        assert!(Arc::ptr_eq(&service, &fetched));
    }

    #[test]
    fn missing_name_is_not_found() {
        let registry = ServiceRegistry::new();
        let err = registry.get("profile").err().unwrap();
        assert!(matches!(err, ApiError::NotFound(ref name) if name == "profile"));
        assert_eq!(err.to_string(), "profile does not exist");
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = ServiceRegistry::new();
        registry.set("dummy", Arc::new(Dummy { id: 1 }));
        registry.set("dummy", Arc::new(Dummy { id: 2 }));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_as::<Dummy>("dummy").unwrap().id, 2);
    }

    #[test]
    fn typed_lookup_with_wrong_type_is_not_found() {
        let mut registry = ServiceRegistry::new();
        registry.set("other", Arc::new(Other));
        let err = registry.get_as::<Dummy>("other").err().unwrap();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn names_are_sorted_and_remove_works() {
        let mut registry = ServiceRegistry::new();
        registry.set("b", Arc::new(Other));
        registry.set("a", Arc::new(Other));
        assert_eq!(registry.names(), vec!["a", "b"]);
        assert!(registry.remove("a").is_some());
        assert!(!registry.contains("a"));
        assert!(registry.remove("a").is_none());
    }
}
