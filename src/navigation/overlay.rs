//! Transient content hosted above the root content

use std::sync::{Arc, Mutex};

use log::{info, warn};
use uuid::Uuid;

use crate::mvvm::{Size, ViewHandle};
use crate::navigation::{ActionDialog, UiDispatcher};

/// What an overlay host carries
#[derive(Clone)]
pub enum OverlayContent {
    View(ViewHandle),
    Dialog(Arc<ActionDialog>),
}

impl OverlayContent {
    fn attached(&self) {
        if let OverlayContent::View(view) = self {
            view.attached();
        }
    }

    fn detached(&self) {
        if let OverlayContent::View(view) = self {
            view.detached();
        }
    }
}

/// Full-surface container for one transient view or dialog
#[derive(Clone)]
pub struct OverlayHost {
    id: Uuid,
    size: Size,
    content: OverlayContent,
}

impl OverlayHost {
    pub fn new(size: Size, content: OverlayContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            size,
            content,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn content(&self) -> &OverlayContent {
        &self.content
    }

    pub fn view(&self) -> Option<&ViewHandle> {
        match &self.content {
            OverlayContent::View(view) => Some(view),
            OverlayContent::Dialog(_) => None,
        }
    }

    pub fn dialog(&self) -> Option<&Arc<ActionDialog>> {
        match &self.content {
            OverlayContent::Dialog(dialog) => Some(dialog),
            OverlayContent::View(_) => None,
        }
    }
}

/// Topmost layer of a display surface, holding hosts in z-order
#[derive(Clone, Default)]
pub struct OverlayLayer {
    children: Arc<Mutex<Vec<OverlayHost>>>,
}

impl OverlayLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_child(&self, host: OverlayHost) {
        self.children.lock().unwrap().push(host);
    }

    /// Remove a host by id, returning it if it was present
    pub fn remove_child(&self, id: Uuid) -> Option<OverlayHost> {
        let mut children = self.children.lock().unwrap();
        let index = children.iter().position(|host| host.id == id)?;
        Some(children.remove(index))
    }

    pub fn children(&self) -> Vec<OverlayHost> {
        self.children.lock().unwrap().clone()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.children.lock().unwrap().iter().any(|host| host.id == id)
    }

    pub fn len(&self) -> usize {
        self.children.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ptr_eq(&self, other: &OverlayLayer) -> bool {
        Arc::ptr_eq(&self.children, &other.children)
    }
}

/// Host placed on a layer, with its content's handlers attached
pub(crate) fn attach_host(layer: &OverlayLayer, host: OverlayHost) -> Uuid {
    let id = host.id;
    host.content.attached();
    layer.add_child(host);
    info!("🪟 Overlay {} attached", id);
    id
}

fn detach_host(layer: &OverlayLayer, id: Uuid) {
    match layer.remove_child(id) {
        Some(host) => {
            host.content.detached();
            info!("🧹 Overlay {} removed", id);
        }
        None => warn!("Overlay {} was already gone from its layer", id),
    }
}

/// Owns the removal of one attached overlay host.
///
/// `release` removes the host on the UI dispatcher and waits until that has
/// happened. If the guard is dropped without being released (the waiting
/// task panicked), removal is posted from `Drop` instead.
pub(crate) struct OverlayGuard<S: Send + 'static> {
    dispatcher: UiDispatcher<S>,
    layer: OverlayLayer,
    id: Uuid,
    released: bool,
}

impl<S: Send + 'static> OverlayGuard<S> {
    pub(crate) fn new(dispatcher: UiDispatcher<S>, layer: OverlayLayer, id: Uuid) -> Self {
        Self {
            dispatcher,
            layer,
            id,
            released: false,
        }
    }

    pub(crate) async fn release(mut self) {
        self.released = true;
        let layer = self.layer.clone();
        let id = self.id;
        if let Err(e) = self.dispatcher.invoke(move |_| detach_host(&layer, id)).await {
            // Dispatcher is gone; nothing else can touch the layer now
            warn!("Removing overlay {} outside the dispatcher: {}", id, e);
            detach_host(&self.layer, id);
        }
    }
}

impl<S: Send + 'static> Drop for OverlayGuard<S> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let layer = self.layer.clone();
        let id = self.id;
        if self.dispatcher.post(move |_| detach_host(&layer, id)).is_err() {
            detach_host(&self.layer, id);
        }
    }
}
