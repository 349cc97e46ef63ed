//! Service location for view-model construction

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Dependency-injection collaborator.
///
/// `resolve` returns a boxed instance of the requested concrete type, or
/// None when the type has no registration.
pub trait ServiceProvider: Send + Sync {
    fn resolve(&self, type_id: TypeId) -> Option<Box<dyn Any + Send>>;
}

type Constructor = Box<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;

/// Minimal transient-only container
#[derive(Default)]
pub struct ServiceCollection {
    constructors: HashMap<TypeId, Constructor>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor; every resolve produces a new instance
    pub fn add_transient<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Any + Send,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let construct: Constructor = Box::new(move || Box::new(factory()) as Box<dyn Any + Send>);
        self.constructors.insert(TypeId::of::<T>(), construct);
        self
    }

    pub fn add_default<T: Any + Send + Default>(&mut self) -> &mut Self {
        self.add_transient(T::default)
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.constructors.contains_key(&TypeId::of::<T>())
    }

    pub fn into_provider(self) -> Arc<dyn ServiceProvider> {
        Arc::new(self)
    }
}

impl ServiceProvider for ServiceCollection {
    fn resolve(&self, type_id: TypeId) -> Option<Box<dyn Any + Send>> {
        self.constructors.get(&type_id).map(|construct| construct())
    }
}
