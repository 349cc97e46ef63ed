//! Root-content navigation, history and view-model lifecycle

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use common::*;
use mvvm_navigation::mvvm::{BaseView, Navigator, ViewHandle, ViewModel, ViewModelCore};
use mvvm_navigation::navigation::{
    ContentRegion, DesktopLifetime, NavigationController, RegionHost, ServiceCollection, TopLevel,
    Window, WindowHost,
};
use mvvm_navigation::{NavigationConfig, NavigationError};

/// Navigating from an empty root stacks the absent root and shows the new view
#[tokio::test]
async fn test_navigate_from_empty_root() {
    init_logging();
    let region = ContentRegion::new();
    let controller = NavigationController::new(RegionHost::new(region.clone()), services());
    controller.register_views::<GreetingView, GreetingViewModel>();

    controller.navigate_to::<GreetingViewModel>().await.unwrap();

    let root = region.content().expect("greeting view is shown");
    assert!(root.is::<GreetingView>());
    assert_eq!(controller.history_depth().await.unwrap(), 1);

    controller.navigate_back().await.unwrap();
    assert!(region.content().is_none());
    assert_eq!(controller.history_depth().await.unwrap(), 0);
}

#[tokio::test]
async fn test_view_is_bound_to_cached_view_model() {
    let (controller, window) = desktop(NavigationConfig::default());

    controller.navigate_to::<GreetingViewModel>().await.unwrap();

    let view_model = controller.get_view_model::<GreetingViewModel>().unwrap();
    let root = window.content().unwrap();
    let view = root.downcast_ref::<GreetingView>().unwrap();
    assert!(Arc::ptr_eq(view.bound().unwrap(), &view_model));
}

#[tokio::test]
async fn test_back_on_empty_history_is_noop() {
    let (controller, window) = desktop(NavigationConfig::default());

    controller.navigate_back().await.unwrap();
    controller.navigate_to_root().await.unwrap();

    assert!(window.content().is_none());
    assert_eq!(controller.history_depth().await.unwrap(), 0);
}

/// Back restores the very object that was shown, not a rebuilt view
#[tokio::test]
async fn test_back_restores_exact_previous_root() {
    let (controller, window) = desktop(NavigationConfig::default());

    controller.navigate_to::<GreetingViewModel>().await.unwrap();
    let greeting = window.content().unwrap();

    controller.navigate_to::<DetailsViewModel>().await.unwrap();
    assert!(window.content().unwrap().is::<DetailsView>());

    controller.navigate_back().await.unwrap();
    assert!(window.content().unwrap().ptr_eq(&greeting));
    assert_eq!(controller.history_depth().await.unwrap(), 1);
}

#[tokio::test]
async fn test_navigate_to_root_keeps_history_depth() {
    let (controller, window) = desktop(NavigationConfig::default());
    let home = ViewHandle::new(Box::new(GreetingView::default()));
    window.set_content(Some(home.clone()));

    controller.navigate_to::<DetailsViewModel>().await.unwrap();
    controller.navigate_to::<GreetingViewModel>().await.unwrap();
    controller.navigate_to::<DetailsViewModel>().await.unwrap();
    assert_eq!(controller.history_depth().await.unwrap(), 3);

    controller.navigate_to_root().await.unwrap();

    assert!(controller.current_root().await.unwrap().unwrap().ptr_eq(&home));
    assert_eq!(controller.history_depth().await.unwrap(), 3);
}

#[tokio::test]
async fn test_show_behaves_like_navigate() {
    let (controller, window) = desktop(NavigationConfig::default());

    controller.show::<GreetingViewModel>().await.unwrap();
    let details = controller.get_view_model::<DetailsViewModel>().unwrap();
    controller.show_view_model(details).await.unwrap();

    assert!(window.content().unwrap().is::<DetailsView>());
    assert_eq!(controller.history_depth().await.unwrap(), 2);
}

#[tokio::test]
async fn test_max_history_evicts_oldest() {
    let config = NavigationConfig::builder().max_history(2).build();
    let (controller, window) = desktop(config);

    controller.navigate_to::<GreetingViewModel>().await.unwrap();
    controller.navigate_to::<DetailsViewModel>().await.unwrap();
    controller.navigate_to::<GreetingViewModel>().await.unwrap();
    assert_eq!(controller.history_depth().await.unwrap(), 2);

    // Oldest entry was the absent root; the bottom is now the first greeting
    controller.navigate_to_root().await.unwrap();
    assert!(window.content().unwrap().is::<GreetingView>());
}

/// A fresh instance gets the controller as its navigator
#[tokio::test]
async fn test_view_model_back_reference_is_controller() {
    let (controller, _window) = desktop(NavigationConfig::default());

    let view_model = controller.get_view_model::<GreetingViewModel>().unwrap();
    let navigator = view_model.core().navigator().unwrap();

    assert!(std::ptr::addr_eq(Arc::as_ptr(&navigator), Arc::as_ptr(&controller)));
}

#[tokio::test]
async fn test_get_view_model_is_cached() {
    let (controller, _window) = desktop(NavigationConfig::default());
    assert!(!controller.has_view_model::<GreetingViewModel>());

    let first = controller.get_view_model::<GreetingViewModel>().unwrap();
    let second = controller.get_view_model::<GreetingViewModel>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(controller.has_view_model::<GreetingViewModel>());
}

#[tokio::test]
async fn test_get_new_view_model_disposes_previous() {
    let (controller, _window) = desktop(NavigationConfig::default());

    let old = controller.get_view_model::<DetailsViewModel>().unwrap();
    let fresh = controller.get_new_view_model::<DetailsViewModel>().unwrap();

    assert!(!Arc::ptr_eq(&old, &fresh));
    assert!(old.disposed.load(Ordering::SeqCst));
    assert!(!fresh.disposed.load(Ordering::SeqCst));
    assert!(fresh.core().has_navigator());

    let cached = controller.get_view_model::<DetailsViewModel>().unwrap();
    assert!(Arc::ptr_eq(&cached, &fresh));
}

#[tokio::test]
async fn test_handlers_follow_root_content() {
    let (controller, _window) = desktop(NavigationConfig::default());
    let details = controller.get_view_model::<DetailsViewModel>().unwrap();

    controller.navigate_to::<DetailsViewModel>().await.unwrap();
    assert_eq!(details.attached.load(Ordering::SeqCst), 1);

    controller.navigate_to::<GreetingViewModel>().await.unwrap();
    assert_eq!(details.detached.load(Ordering::SeqCst), 1);

    controller.navigate_back().await.unwrap();
    assert_eq!(details.attached.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_view_model_can_navigate_back_through_core() {
    let (controller, window) = desktop(NavigationConfig::default());

    controller.navigate_to::<GreetingViewModel>().await.unwrap();
    controller.navigate_to::<DetailsViewModel>().await.unwrap();

    let details = controller.get_view_model::<DetailsViewModel>().unwrap();
    details.core().go_back().await.unwrap();

    assert!(window.content().unwrap().is::<GreetingView>());
}

#[tokio::test]
async fn test_unregistered_view_model() {
    let (controller, window) = desktop(NavigationConfig::default());

    let outcome = controller.navigate_to::<UnregisteredViewModel>().await;

    assert!(matches!(outcome, Err(NavigationError::ViewModelNotRegistered(_))));
    assert!(controller.get_view_model::<UnregisteredViewModel>().is_none());
    assert!(window.content().is_none());
}

#[tokio::test]
async fn test_missing_view_mapping() {
    let (controller, window) = desktop(NavigationConfig::default());
    controller.navigate_to::<GreetingViewModel>().await.unwrap();
    let greeting = window.content().unwrap();

    let outcome = controller.navigate_to::<UnmappedViewModel>().await;

    assert!(matches!(outcome, Err(NavigationError::MappingNotFound(_))));
    assert!(window.content().unwrap().ptr_eq(&greeting));
    assert_eq!(controller.history_depth().await.unwrap(), 1);
}

#[tokio::test]
async fn test_view_construction_failure() {
    let (controller, _window) = desktop(NavigationConfig::default());
    controller.register_view_factory::<UnmappedViewModel, BaseView<UnmappedViewModel>, _, String>(|| {
        Err("template missing".to_string())
    });

    let outcome = controller.navigate_to::<UnmappedViewModel>().await;

    match outcome {
        Err(NavigationError::ViewConstruction { reason, .. }) => assert_eq!(reason, "template missing"),
        other => panic!("expected a construction error, got {:?}", other),
    }
    assert_eq!(controller.history_depth().await.unwrap(), 0);
}

#[tokio::test]
async fn test_close_is_not_supported() {
    let (controller, _window) = desktop(NavigationConfig::default());

    assert!(matches!(controller.close().await, Err(NavigationError::NotSupported(_))));

    let navigator: Arc<dyn Navigator> = controller.clone();
    assert!(matches!(navigator.close().await, Err(NavigationError::NotSupported(_))));
}

/// Without a main window forward navigation is skipped and history stays empty
#[tokio::test]
async fn test_window_host_without_main_window() {
    init_logging();
    let controller = NavigationController::new(WindowHost::new(DesktopLifetime::new()), services());
    controller.register_views::<GreetingView, GreetingViewModel>();

    controller.navigate_to::<GreetingViewModel>().await.unwrap();

    assert!(controller.current_root().await.unwrap().is_none());
    assert_eq!(controller.history_depth().await.unwrap(), 0);
}

#[tokio::test]
async fn test_back_after_late_main_window_keeps_content() {
    init_logging();
    let lifetime = DesktopLifetime::new();
    let controller = NavigationController::new(WindowHost::new(lifetime.clone()), services());
    register_views(&controller);
    controller.navigate_to::<GreetingViewModel>().await.unwrap();

    let window = Window::new(TopLevel::new(SURFACE));
    let home = ViewHandle::new(Box::new(GreetingView::default()));
    window.set_content(Some(home.clone()));
    lifetime.set_main_window(Some(window.clone()));

    controller.navigate_back().await.unwrap();
    assert!(window.content().unwrap().ptr_eq(&home));

    controller.navigate_to::<DetailsViewModel>().await.unwrap();
    assert_eq!(controller.history_depth().await.unwrap(), 1);
    controller.navigate_back().await.unwrap();
    assert!(window.content().unwrap().ptr_eq(&home));
    assert_eq!(controller.history_depth().await.unwrap(), 0);
}

/// Panics the first time it is attached
struct FragileViewModel {
    core: ViewModelCore,
    armed: AtomicBool,
}

impl ViewModel for FragileViewModel {
    fn core(&self) -> &ViewModelCore {
        &self.core
    }

    fn attach_handlers(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            panic!("attach failed");
        }
    }
}

type FragileView = BaseView<FragileViewModel>;

#[tokio::test]
async fn test_panicking_hook_does_not_stop_navigation() {
    init_logging();
    let window = Window::new(TopLevel::new(SURFACE));
    let mut services = ServiceCollection::new();
    services.add_default::<GreetingViewModel>().add_transient(|| FragileViewModel {
        core: ViewModelCore::default(),
        armed: AtomicBool::new(true),
    });
    let host = WindowHost::new(DesktopLifetime::with_main_window(window.clone()));
    let controller = NavigationController::new(host, services.into_provider());
    controller.register_views::<GreetingView, GreetingViewModel>();
    controller.register_views::<FragileView, FragileViewModel>();

    match controller.navigate_to::<FragileViewModel>().await {
        Err(NavigationError::JobPanicked(message)) => assert_eq!(message, "attach failed"),
        other => panic!("expected a panicked job, got {:?}", other),
    }
    // The root was swapped before the hook ran
    assert!(window.content().unwrap().is::<FragileView>());

    controller.navigate_to::<GreetingViewModel>().await.unwrap();
    assert!(window.content().unwrap().is::<GreetingView>());
    assert_eq!(controller.history_depth().await.unwrap(), 2);

    controller.navigate_back().await.unwrap();
    assert!(window.content().unwrap().is::<FragileView>());
}

/// Checks the controller cache from inside `dispose`
struct SessionViewModel {
    core: ViewModelCore,
    controller: Weak<NavigationController<WindowHost>>,
    greeting_cached_at_dispose: AtomicBool,
}

impl ViewModel for SessionViewModel {
    fn core(&self) -> &ViewModelCore {
        &self.core
    }

    fn dispose(&self) {
        if let Some(controller) = self.controller.upgrade() {
            let cached = controller.has_view_model::<GreetingViewModel>()
                && controller.get_view_model::<GreetingViewModel>().is_some();
            self.greeting_cached_at_dispose.store(cached, Ordering::SeqCst);
        }
    }
}

#[tokio::test]
async fn test_view_model_hooks_can_query_controller() {
    init_logging();
    let slot: Arc<OnceLock<Weak<NavigationController<WindowHost>>>> = Arc::new(OnceLock::new());
    let lookup = slot.clone();
    let mut services = ServiceCollection::new();
    services.add_default::<GreetingViewModel>().add_transient(move || {
        let controller = lookup.get().cloned().unwrap_or_default();
        // Construction pulls a sibling view-model from the same controller
        if let Some(controller) = controller.upgrade() {
            controller.get_view_model::<GreetingViewModel>();
        }
        SessionViewModel {
            core: ViewModelCore::default(),
            controller,
            greeting_cached_at_dispose: AtomicBool::new(false),
        }
    });
    let window = Window::new(TopLevel::new(SURFACE));
    let host = WindowHost::new(DesktopLifetime::with_main_window(window));
    let controller = NavigationController::new(host, services.into_provider());
    slot.set(Arc::downgrade(&controller)).unwrap();

    let first = controller.get_view_model::<SessionViewModel>().unwrap();
    assert!(controller.has_view_model::<GreetingViewModel>());

    let fresh = controller.get_new_view_model::<SessionViewModel>().unwrap();

    assert!(first.greeting_cached_at_dispose.load(Ordering::SeqCst));
    assert!(!Arc::ptr_eq(&first, &fresh));
}
