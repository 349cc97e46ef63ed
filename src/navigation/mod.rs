//! View-model lifecycle and navigation

pub mod controller;
pub mod dialog;
pub mod dispatcher;
pub mod hosts;
pub mod overlay;
pub mod registry;
pub mod resolver;
pub mod services;
pub mod stack;

pub use crate::error::{NavigationError, Result};
pub use controller::{NavigationController, RootHost};
pub use dialog::ActionDialog;
pub use dispatcher::UiDispatcher;
pub use hosts::{ContentRegion, DesktopLifetime, RegionHost, TopLevel, Window, WindowHost};
pub use overlay::{OverlayContent, OverlayHost, OverlayLayer};
pub use registry::ViewModelRegistry;
pub use resolver::ViewResolver;
pub use services::{ServiceCollection, ServiceProvider};
pub use stack::NavigationStack;
