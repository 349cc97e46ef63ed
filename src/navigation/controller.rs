//! Navigation controller: root content, back history and overlay presentation
//!
//! Every mutation of the hosted UI runs as a job on the controller's
//! [`UiDispatcher`], so operations issued from any task are applied one at a
//! time in submission order. View-model lookup and view resolution happen on
//! the caller's task; their errors surface before anything is queued.

use std::sync::{Arc, RwLock, Weak};

use anyhow::anyhow;
use async_trait::async_trait;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::NavigationConfig;
use crate::error::{NavigationError, Result};
use crate::mvvm::{BindView, Navigator, ResultProvider, Size, UiAction, View, ViewHandle, ViewModel};
use crate::navigation::overlay::{OverlayGuard, attach_host};
use crate::navigation::{
    ActionDialog, NavigationStack, OverlayContent, OverlayHost, OverlayLayer, ServiceProvider,
    UiDispatcher, ViewModelRegistry, ViewResolver,
};

/// Rendering collaborator: where root content lives and where overlays go.
///
/// Adapters differ only in how they read and write root content; all of
/// them must report a missing surface or overlay layer as None.
pub trait RootHost: Send + 'static {
    fn current_root(&self) -> Option<ViewHandle>;

    fn set_root(&mut self, content: Option<ViewHandle>);

    /// False while root writes would be dropped; forward navigation is then
    /// skipped without touching history
    fn accepts_root(&self) -> bool {
        true
    }

    fn display_surface(&self) -> Option<Size>;

    fn overlay_layer(&self) -> Option<OverlayLayer>;
}

/// Owned by the dispatcher task
struct UiState<H> {
    host: H,
    history: NavigationStack<Option<ViewHandle>>,
}

impl<H: RootHost> UiState<H> {
    fn show_root(&mut self, content: Option<ViewHandle>) {
        if let Some(previous) = self.host.current_root() {
            previous.detached();
        }
        self.host.set_root(content.clone());
        if let Some(current) = &content {
            current.attached();
        }
    }

    fn push_root(&mut self, view: ViewHandle) {
        if !self.host.accepts_root() {
            warn!("Host cannot show root content; navigation to {:?} skipped", view);
            return;
        }
        let previous = self.host.current_root();
        if self.history.push(previous).is_some() {
            debug!("History limit reached, dropped oldest entry");
        }
        info!("➡️  Navigating to {:?} (history depth {})", view, self.history.len());
        self.show_root(Some(view));
    }

    fn pop_root(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                info!("⬅️  Navigating back (history depth {})", self.history.len());
                self.show_root(previous);
                true
            }
            None => {
                debug!("Back requested with empty history");
                false
            }
        }
    }

    fn activate_bottom(&mut self) -> bool {
        match self.history.peek_bottom().cloned() {
            Some(root) => {
                info!("⏮️  Navigating to root (history depth {})", self.history.len());
                self.show_root(root);
                true
            }
            None => {
                debug!("Root requested with empty history");
                false
            }
        }
    }

    fn open_overlay<F>(&mut self, exclusive: bool, build: F) -> Result<(OverlayLayer, Uuid)>
    where
        F: FnOnce(Size) -> OverlayContent,
    {
        if self.host.current_root().is_none() {
            return Err(NavigationError::NoActiveView);
        }
        let surface = self
            .host
            .display_surface()
            .ok_or(NavigationError::NoDisplaySurface)?;
        let layer = self
            .host
            .overlay_layer()
            .ok_or(NavigationError::NoOverlayLayer)?;
        if exclusive && !layer.is_empty() {
            return Err(NavigationError::OverlayBusy);
        }

        let host = OverlayHost::new(surface, build(surface));
        let id = attach_host(&layer, host);
        Ok((layer, id))
    }
}

pub struct NavigationController<H: RootHost> {
    config: NavigationConfig,
    registry: ViewModelRegistry,
    resolver: RwLock<ViewResolver>,
    dispatcher: UiDispatcher<UiState<H>>,
}

impl<H: RootHost> NavigationController<H> {
    /// Must be called from within a tokio runtime
    pub fn new(host: H, services: Arc<dyn ServiceProvider>) -> Arc<Self> {
        Self::with_config(host, services, NavigationConfig::default())
    }

    pub fn with_config(host: H, services: Arc<dyn ServiceProvider>, config: NavigationConfig) -> Arc<Self> {
        let state = UiState {
            host,
            history: NavigationStack::with_max_depth(config.max_history),
        };
        let dispatcher = UiDispatcher::spawn(state);

        Arc::new_cyclic(|me: &Weak<Self>| {
            let navigator: Weak<dyn Navigator> = me.clone();
            Self {
                config,
                registry: ViewModelRegistry::new(services, navigator),
                resolver: RwLock::new(ViewResolver::new()),
                dispatcher,
            }
        })
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn register_views<V, VM>(&self)
    where
        V: BindView<VM> + Default,
        VM: ViewModel,
    {
        self.resolver.write().unwrap().register::<V, VM>();
    }

    pub fn register_view_factory<VM, V, F, E>(&self, build: F)
    where
        VM: ViewModel,
        V: BindView<VM>,
        F: Fn() -> std::result::Result<V, E> + Send + Sync + 'static,
        E: std::fmt::Display,
    {
        self.resolver.write().unwrap().register_factory::<VM, V, F, E>(build);
    }

    /// Cached or newly created instance; None if `T` has no service registration
    pub fn get_view_model<T: ViewModel>(&self) -> Option<Arc<T>> {
        self.registry.get::<T>()
    }

    /// Always a fresh instance; any cached one is disposed first
    pub fn get_new_view_model<T: ViewModel>(&self) -> Option<Arc<T>> {
        self.registry.get_or_replace::<T>()
    }

    pub fn has_view_model<T: ViewModel>(&self) -> bool {
        self.registry.has::<T>()
    }

    /// Replace root content with a new view for `view_model`, pushing the
    /// previous root (possibly none) onto the history
    pub async fn navigate_to_view_model<T: ViewModel>(&self, view_model: Arc<T>) -> Result<()> {
        let view = ViewHandle::new(self.create_view(view_model)?);
        self.dispatcher.invoke(move |ui| ui.push_root(view)).await
    }

    pub async fn navigate_to<T: ViewModel>(&self) -> Result<()> {
        let view_model = self.require_view_model::<T>()?;
        self.navigate_to_view_model(view_model).await
    }

    /// Same as [`navigate_to_view_model`](Self::navigate_to_view_model)
    pub async fn show_view_model<T: ViewModel>(&self, view_model: Arc<T>) -> Result<()> {
        self.navigate_to_view_model(view_model).await
    }

    pub async fn show<T: ViewModel>(&self) -> Result<()> {
        self.navigate_to::<T>().await
    }

    /// Host a view for `view_model` in an overlay and wait for its result.
    ///
    /// The overlay is removed once the result resolves, whether it succeeded
    /// or failed, before the outcome is returned. Dropping the returned
    /// future does not remove the overlay early.
    pub async fn show_view_model_for_result<T, R>(&self, view_model: Arc<T>) -> Result<R>
    where
        T: ResultProvider<R>,
        R: Send + 'static,
    {
        let mut view = self.create_view(view_model.clone())?;
        let margin = self.config.overlay_margin;
        let guard = self
            .open_overlay(move |surface| {
                view.set_max_size(surface.shrink(margin.horizontal, margin.vertical));
                OverlayContent::View(ViewHandle::new(view))
            })
            .await?;

        view_model.core().set_expects_result(true);
        let waiting = tokio::spawn(async move {
            let outcome = view_model.get_result().await;
            view_model.core().set_expects_result(false);
            guard.release().await;
            outcome
        });

        match waiting.await {
            Ok(outcome) => outcome.map_err(NavigationError::ResultFaulted),
            Err(e) => Err(NavigationError::ResultFaulted(anyhow!("result task failed: {e}"))),
        }
    }

    pub async fn show_for_result<T, R>(&self) -> Result<R>
    where
        T: ResultProvider<R>,
        R: Send + 'static,
    {
        let view_model = self.require_view_model::<T>()?;
        self.show_view_model_for_result::<T, R>(view_model).await
    }

    /// Show a choice dialog and return the picked action.
    ///
    /// Returns None when there is no active view or display surface to host
    /// the dialog; a missing overlay layer is an error.
    pub async fn ask_for_action(
        &self,
        title: &str,
        description: &str,
        actions: Vec<UiAction>,
    ) -> Result<Option<UiAction>> {
        let mut dialog = ActionDialog::new();
        dialog.initialize(title, description, actions);
        let dialog = Arc::new(dialog);

        let content = OverlayContent::Dialog(dialog.clone());
        let guard = match self.open_overlay(move |_| content).await {
            Ok(guard) => guard,
            Err(e) if e.is_missing_surface() => {
                debug!("Action dialog '{}' not shown: {}", title, e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let waiting = tokio::spawn(async move {
            let selected = dialog.get_result().await;
            guard.release().await;
            selected
        });

        match waiting.await {
            Ok(selected) => selected.map(Some),
            Err(e) => Err(NavigationError::ResultFaulted(anyhow!("dialog task failed: {e}"))),
        }
    }

    /// Restore the previous root content; no-op on empty history
    pub async fn navigate_back(&self) -> Result<()> {
        self.dispatcher.invoke(|ui| ui.pop_root()).await?;
        Ok(())
    }

    /// Re-activate the oldest history entry without popping anything
    pub async fn navigate_to_root(&self) -> Result<()> {
        self.dispatcher.invoke(|ui| ui.activate_bottom()).await?;
        Ok(())
    }

    pub async fn close(&self) -> Result<()> {
        Err(NavigationError::NotSupported("close"))
    }

    pub async fn current_root(&self) -> Result<Option<ViewHandle>> {
        self.dispatcher.invoke(|ui| ui.host.current_root()).await
    }

    pub async fn history_depth(&self) -> Result<usize> {
        self.dispatcher.invoke(|ui| ui.history.len()).await
    }

    fn require_view_model<T: ViewModel>(&self) -> Result<Arc<T>> {
        self.get_view_model::<T>()
            .ok_or(NavigationError::ViewModelNotRegistered(std::any::type_name::<T>()))
    }

    fn create_view<T: ViewModel>(&self, view_model: Arc<T>) -> Result<Box<dyn View>> {
        self.resolver.read().unwrap().resolve(view_model)
    }

    async fn open_overlay<F>(&self, build: F) -> Result<OverlayGuard<UiState<H>>>
    where
        F: FnOnce(Size) -> OverlayContent + Send + 'static,
    {
        let exclusive = self.config.exclusive_overlays;
        let (layer, id) = self
            .dispatcher
            .invoke(move |ui| ui.open_overlay(exclusive, build))
            .await??;
        Ok(OverlayGuard::new(self.dispatcher.clone(), layer, id))
    }
}

#[async_trait]
impl<H: RootHost> Navigator for NavigationController<H> {
    async fn navigate_back(&self) -> Result<()> {
        NavigationController::navigate_back(self).await
    }

    async fn navigate_to_root(&self) -> Result<()> {
        NavigationController::navigate_to_root(self).await
    }

    async fn close(&self) -> Result<()> {
        NavigationController::close(self).await
    }

    async fn ask_for_action(
        &self,
        title: &str,
        description: &str,
        actions: Vec<UiAction>,
    ) -> Result<Option<UiAction>> {
        NavigationController::ask_for_action(self, title, description, actions).await
    }
}
