//! Live view-model instances, at most one per concrete type
//!
//! The cache lock is never held while user code runs: service construction
//! and `dispose` happen outside it, so either may call back into the registry.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use log::{debug, info, warn};

use crate::mvvm::{Navigator, ViewModel};
use crate::navigation::ServiceProvider;

struct Entry {
    instance: Arc<dyn Any + Send + Sync>,
    view_model: Arc<dyn ViewModel>,
}

impl Entry {
    fn new<T: ViewModel>(view_model: &Arc<T>) -> Self {
        Self {
            instance: view_model.clone(),
            view_model: view_model.clone(),
        }
    }
}

pub struct ViewModelRegistry {
    services: Arc<dyn ServiceProvider>,
    navigator: Weak<dyn Navigator>,
    entries: Mutex<HashMap<TypeId, Entry>>,
}

impl ViewModelRegistry {
    /// `navigator` is injected into every instance this registry creates
    pub fn new(services: Arc<dyn ServiceProvider>, navigator: Weak<dyn Navigator>) -> Self {
        Self {
            services,
            navigator,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cached instance of `T`, creating and caching one on first request.
    /// None when the service provider cannot produce a `T`.
    pub fn get<T: ViewModel>(&self) -> Option<Arc<T>> {
        if let Some(existing) = self.cached::<T>() {
            return Some(existing);
        }
        let created = self.create::<T>()?;

        let mut entries = self.entries.lock().unwrap();
        // Another caller may have cached one while we were building
        if let Some(winner) = entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.instance.clone().downcast::<T>().ok())
        {
            return Some(winner);
        }
        entries.insert(TypeId::of::<T>(), Entry::new(&created));
        debug!("Cached view-model {}", std::any::type_name::<T>());
        Some(created)
    }

    /// Evict and dispose any live `T`, then cache and return a fresh one
    pub fn get_or_replace<T: ViewModel>(&self) -> Option<Arc<T>> {
        let previous = self.entries.lock().unwrap().remove(&TypeId::of::<T>());
        if let Some(previous) = previous {
            previous.view_model.dispose();
            info!("♻️  Replaced view-model {}", std::any::type_name::<T>());
        }

        let created = self.create::<T>()?;
        let displaced = self
            .entries
            .lock()
            .unwrap()
            .insert(TypeId::of::<T>(), Entry::new(&created));
        if let Some(displaced) = displaced {
            displaced.view_model.dispose();
        }
        Some(created)
    }

    pub fn has<T: ViewModel>(&self) -> bool {
        self.entries.lock().unwrap().contains_key(&TypeId::of::<T>())
    }

    /// Drop the given instance from the cache. Returns false if it is not cached.
    pub fn remove<T: ViewModel + ?Sized>(&self, instance: &Arc<T>) -> bool {
        let mut entries = self.entries.lock().unwrap();
        let key = entries
            .iter()
            .find(|(_, entry)| std::ptr::addr_eq(Arc::as_ptr(&entry.view_model), Arc::as_ptr(instance)))
            .map(|(key, _)| *key);

        match key {
            Some(key) => {
                entries.remove(&key);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    fn cached<T: ViewModel>(&self) -> Option<Arc<T>> {
        let entries = self.entries.lock().unwrap();
        let entry = entries.get(&TypeId::of::<T>())?;
        entry.instance.clone().downcast::<T>().ok()
    }

    /// Build an uncached `T` with the navigator already injected
    fn create<T: ViewModel>(&self) -> Option<Arc<T>> {
        let name = std::any::type_name::<T>();
        let Some(boxed) = self.services.resolve(TypeId::of::<T>()) else {
            debug!("No service registration for {}", name);
            return None;
        };
        let view_model: Arc<T> = match boxed.downcast::<T>() {
            Ok(view_model) => Arc::from(view_model),
            Err(_) => {
                warn!("Service provider returned the wrong type for {}", name);
                return None;
            }
        };

        view_model.core().set_navigator(self.navigator.clone());
        debug!("Created view-model {}", name);
        Some(view_model)
    }
}
