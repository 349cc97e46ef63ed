//! Shared view-models and host setup for the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;

use mvvm_navigation::mvvm::{BaseView, ResultProvider, ResultSlot, Size, ViewModel, ViewModelCore};
use mvvm_navigation::navigation::{
    DesktopLifetime, NavigationController, OverlayHost, OverlayLayer, ServiceCollection,
    ServiceProvider, TopLevel, Window, WindowHost,
};
use mvvm_navigation::NavigationConfig;

pub const SURFACE: Size = Size {
    width: 1280,
    height: 800,
};

#[derive(Default)]
pub struct GreetingViewModel {
    core: ViewModelCore,
}

impl ViewModel for GreetingViewModel {
    fn core(&self) -> &ViewModelCore {
        &self.core
    }
}

pub type GreetingView = BaseView<GreetingViewModel>;

/// Records lifecycle hook calls
#[derive(Default)]
pub struct DetailsViewModel {
    core: ViewModelCore,
    pub attached: AtomicUsize,
    pub detached: AtomicUsize,
    pub disposed: AtomicBool,
}

impl ViewModel for DetailsViewModel {
    fn core(&self) -> &ViewModelCore {
        &self.core
    }

    fn attach_handlers(&self) {
        self.attached.fetch_add(1, Ordering::SeqCst);
    }

    fn detach_handlers(&self) {
        self.detached.fetch_add(1, Ordering::SeqCst);
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }
}

pub type DetailsView = BaseView<DetailsViewModel>;

/// Completes with whatever the test feeds it; an `Err` faults the result
#[derive(Default)]
pub struct PromptViewModel {
    core: ViewModelCore,
    answer: ResultSlot<Result<String, String>>,
}

impl PromptViewModel {
    pub fn answer(&self, text: &str) -> bool {
        self.answer.try_set(Ok(text.to_string()))
    }

    pub fn fail(&self, reason: &str) -> bool {
        self.answer.try_set(Err(reason.to_string()))
    }
}

impl ViewModel for PromptViewModel {
    fn core(&self) -> &ViewModelCore {
        &self.core
    }
}

#[async_trait]
impl ResultProvider<String> for PromptViewModel {
    async fn get_result(&self) -> anyhow::Result<String> {
        match self.answer.wait().await? {
            Ok(text) => Ok(text),
            Err(reason) => Err(anyhow!(reason)),
        }
    }
}

pub type PromptView = BaseView<PromptViewModel>;

/// Has a service registration but no view
#[derive(Default)]
pub struct UnmappedViewModel {
    core: ViewModelCore,
}

impl ViewModel for UnmappedViewModel {
    fn core(&self) -> &ViewModelCore {
        &self.core
    }
}

/// Has a view but no service registration
#[derive(Default)]
pub struct UnregisteredViewModel {
    core: ViewModelCore,
}

impl ViewModel for UnregisteredViewModel {
    fn core(&self) -> &ViewModelCore {
        &self.core
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn services() -> Arc<dyn ServiceProvider> {
    let mut services = ServiceCollection::new();
    services
        .add_default::<GreetingViewModel>()
        .add_default::<DetailsViewModel>()
        .add_default::<PromptViewModel>()
        .add_default::<UnmappedViewModel>();
    services.into_provider()
}

pub fn register_views(controller: &NavigationController<WindowHost>) {
    controller.register_views::<GreetingView, GreetingViewModel>();
    controller.register_views::<DetailsView, DetailsViewModel>();
    controller.register_views::<PromptView, PromptViewModel>();
    controller.register_views::<BaseView<UnregisteredViewModel>, UnregisteredViewModel>();
}

/// Controller over a desktop lifetime whose main window is returned too
pub fn desktop(config: NavigationConfig) -> (Arc<NavigationController<WindowHost>>, Window) {
    init_logging();
    let window = Window::new(TopLevel::new(SURFACE));
    let host = WindowHost::new(DesktopLifetime::with_main_window(window.clone()));
    let controller = NavigationController::with_config(host, services(), config);
    register_views(&controller);
    (controller, window)
}

pub fn overlay_layer(window: &Window) -> OverlayLayer {
    window
        .top_level()
        .overlay_layer()
        .expect("test window has an overlay layer")
}

/// Wait until `layer` hosts at least one overlay and return the topmost
pub async fn wait_for_overlay(layer: &OverlayLayer) -> OverlayHost {
    let poll = async {
        loop {
            if let Some(host) = layer.children().pop() {
                return host;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(5), poll)
        .await
        .expect("overlay never appeared")
}

pub async fn wait_until_empty(layer: &OverlayLayer) {
    let poll = async {
        while !layer.is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(5), poll)
        .await
        .expect("overlay was never removed");
}
