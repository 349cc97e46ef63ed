//! View-model type to view factory mapping

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

use log::{debug, warn};

use crate::error::{NavigationError, Result};
use crate::mvvm::{BindView, View, ViewModel};

type ViewFactory = Box<dyn Fn(Arc<dyn Any + Send + Sync>) -> Result<Box<dyn View>> + Send + Sync>;

struct Registration {
    view_name: &'static str,
    factory: ViewFactory,
}

/// Populated once at startup; every resolve builds a fresh, bound view
#[derive(Default)]
pub struct ViewResolver {
    registrations: HashMap<TypeId, Registration>,
}

impl ViewResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `VM` to a default-constructed `V`. A second registration for the
    /// same view-model replaces the first.
    pub fn register<V, VM>(&mut self)
    where
        V: BindView<VM> + Default,
        VM: ViewModel,
    {
        self.register_factory::<VM, V, _, Infallible>(|| Ok(V::default()));
    }

    /// Map `VM` to views built by `build`; a failing build surfaces as
    /// [`NavigationError::ViewConstruction`]
    pub fn register_factory<VM, V, F, E>(&mut self, build: F)
    where
        VM: ViewModel,
        V: BindView<VM>,
        F: Fn() -> std::result::Result<V, E> + Send + Sync + 'static,
        E: Display,
    {
        let view_model_name = std::any::type_name::<VM>();
        let view_name = std::any::type_name::<V>();

        let factory: ViewFactory = Box::new(move |instance| {
            let view_model = instance.downcast::<VM>().map_err(|_| NavigationError::ViewConstruction {
                view_model: view_model_name,
                reason: "view-model instance does not match its registration".to_string(),
            })?;
            let mut view = build().map_err(|e| NavigationError::ViewConstruction {
                view_model: view_model_name,
                reason: e.to_string(),
            })?;
            view.bind(view_model);
            view.on_view_model_set();
            Ok(Box::new(view) as Box<dyn View>)
        });

        let previous = self
            .registrations
            .insert(TypeId::of::<VM>(), Registration { view_name, factory });
        match previous {
            Some(previous) => warn!(
                "View for {} re-registered: {} replaces {}",
                view_model_name, view_name, previous.view_name
            ),
            None => debug!("Registered {} for {}", view_name, view_model_name),
        }
    }

    pub fn is_registered<VM: ViewModel>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<VM>())
    }

    /// Build a new view for `view_model` and bind it
    pub fn resolve<VM: ViewModel>(&self, view_model: Arc<VM>) -> Result<Box<dyn View>> {
        let registration = self
            .registrations
            .get(&TypeId::of::<VM>())
            .ok_or(NavigationError::MappingNotFound(std::any::type_name::<VM>()))?;
        (registration.factory)(view_model as Arc<dyn Any + Send + Sync>)
    }
}
