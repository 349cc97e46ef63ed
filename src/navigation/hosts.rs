//! Root-content adapters for window-hosted and region-hosted applications
//!
//! The handle types here are cheap to clone and share their state, so a
//! toolkit binding (or a test) can keep one copy while the controller drives
//! another.

use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::mvvm::{Size, ViewHandle};
use crate::navigation::{OverlayLayer, RootHost};

struct TopLevelInner {
    size: Size,
    overlay_layer: Option<OverlayLayer>,
}

/// Outermost visual surface: its size and optional overlay layer
#[derive(Clone)]
pub struct TopLevel {
    inner: Arc<Mutex<TopLevelInner>>,
}

impl TopLevel {
    pub fn new(size: Size) -> Self {
        Self::build(size, Some(OverlayLayer::new()))
    }

    /// Surface that cannot host overlays
    pub fn without_overlay(size: Size) -> Self {
        Self::build(size, None)
    }

    fn build(size: Size, overlay_layer: Option<OverlayLayer>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TopLevelInner { size, overlay_layer })),
        }
    }

    pub fn size(&self) -> Size {
        self.inner.lock().unwrap().size
    }

    pub fn resize(&self, size: Size) {
        self.inner.lock().unwrap().size = size;
    }

    pub fn overlay_layer(&self) -> Option<OverlayLayer> {
        self.inner.lock().unwrap().overlay_layer.clone()
    }
}

#[derive(Clone)]
pub struct Window {
    top_level: TopLevel,
    content: Arc<Mutex<Option<ViewHandle>>>,
}

impl Window {
    pub fn new(top_level: TopLevel) -> Self {
        Self {
            top_level,
            content: Arc::new(Mutex::new(None)),
        }
    }

    pub fn top_level(&self) -> &TopLevel {
        &self.top_level
    }

    pub fn content(&self) -> Option<ViewHandle> {
        self.content.lock().unwrap().clone()
    }

    pub fn set_content(&self, content: Option<ViewHandle>) {
        *self.content.lock().unwrap() = content;
    }
}

/// Desktop application lifetime with an optional main window
#[derive(Clone, Default)]
pub struct DesktopLifetime {
    main_window: Arc<Mutex<Option<Window>>>,
}

impl DesktopLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_main_window(window: Window) -> Self {
        let lifetime = Self::new();
        lifetime.set_main_window(Some(window));
        lifetime
    }

    pub fn main_window(&self) -> Option<Window> {
        self.main_window.lock().unwrap().clone()
    }

    pub fn set_main_window(&self, window: Option<Window>) {
        *self.main_window.lock().unwrap() = window;
    }
}

/// Root content lives on the desktop lifetime's main window
pub struct WindowHost {
    lifetime: DesktopLifetime,
}

impl WindowHost {
    pub fn new(lifetime: DesktopLifetime) -> Self {
        Self { lifetime }
    }

    pub fn lifetime(&self) -> &DesktopLifetime {
        &self.lifetime
    }
}

impl RootHost for WindowHost {
    fn current_root(&self) -> Option<ViewHandle> {
        self.lifetime.main_window()?.content()
    }

    fn set_root(&mut self, content: Option<ViewHandle>) {
        match self.lifetime.main_window() {
            Some(window) => window.set_content(content),
            None => warn!("No main window; root content change ignored"),
        }
    }

    fn accepts_root(&self) -> bool {
        self.lifetime.main_window().is_some()
    }

    fn display_surface(&self) -> Option<Size> {
        self.lifetime
            .main_window()
            .map(|window| window.top_level().size())
    }

    fn overlay_layer(&self) -> Option<OverlayLayer> {
        self.lifetime.main_window()?.top_level().overlay_layer()
    }
}

struct RegionInner {
    content: Option<ViewHandle>,
    top_level: Option<TopLevel>,
}

/// Fixed container whose displayed content is the root content
#[derive(Clone)]
pub struct ContentRegion {
    inner: Arc<Mutex<RegionInner>>,
}

impl Default for ContentRegion {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRegion {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegionInner {
                content: None,
                top_level: None,
            })),
        }
    }

    pub fn attached_to(top_level: TopLevel) -> Self {
        let region = Self::new();
        region.attach(top_level);
        region
    }

    pub fn attach(&self, top_level: TopLevel) {
        debug!("Content region attached to a top level");
        self.inner.lock().unwrap().top_level = Some(top_level);
    }

    pub fn detach(&self) {
        debug!("Content region detached");
        self.inner.lock().unwrap().top_level = None;
    }

    pub fn top_level(&self) -> Option<TopLevel> {
        self.inner.lock().unwrap().top_level.clone()
    }

    pub fn content(&self) -> Option<ViewHandle> {
        self.inner.lock().unwrap().content.clone()
    }

    pub fn set_content(&self, content: Option<ViewHandle>) {
        self.inner.lock().unwrap().content = content;
    }
}

/// Root content lives on a single fixed region
pub struct RegionHost {
    region: ContentRegion,
}

impl RegionHost {
    pub fn new(region: ContentRegion) -> Self {
        Self { region }
    }

    pub fn region(&self) -> &ContentRegion {
        &self.region
    }
}

impl RootHost for RegionHost {
    fn current_root(&self) -> Option<ViewHandle> {
        self.region.content()
    }

    fn set_root(&mut self, content: Option<ViewHandle>) {
        self.region.set_content(content);
    }

    fn display_surface(&self) -> Option<Size> {
        self.region.top_level().map(|top_level| top_level.size())
    }

    fn overlay_layer(&self) -> Option<OverlayLayer> {
        self.region.top_level()?.overlay_layer()
    }
}
