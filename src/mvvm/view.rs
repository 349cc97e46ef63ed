use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::mvvm::{AsAny, ViewModel};

/// Extent of a display surface or hosted element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Subtract fixed margins, never going below zero
    pub fn shrink(self, horizontal: u32, vertical: u32) -> Self {
        Self {
            width: self.width.saturating_sub(horizontal),
            height: self.height.saturating_sub(vertical),
        }
    }
}

/// Visual unit bound to exactly one view-model for its lifetime
pub trait View: AsAny {
    fn view_model(&self) -> Option<Arc<dyn ViewModel>>;

    /// Upper bound applied when the view is hosted in an overlay
    fn set_max_size(&mut self, _max: Size) {}

    fn max_size(&self) -> Option<Size> {
        None
    }

    /// Called once the view-model has been bound
    fn on_view_model_set(&mut self) {}
}

/// Typed binding used by the view resolver right after construction
pub trait BindView<VM: ViewModel>: View {
    fn bind(&mut self, view_model: Arc<VM>);
}

/// Shared reference to a constructed view.
///
/// Equality is identity: two handles are equal only if they point at the
/// same view instance.
#[derive(Clone)]
pub struct ViewHandle(Arc<dyn View>);

impl ViewHandle {
    pub fn new(view: Box<dyn View>) -> Self {
        Self(Arc::from(view))
    }

    pub fn view(&self) -> &dyn View {
        self.0.as_ref()
    }

    pub fn view_model(&self) -> Option<Arc<dyn ViewModel>> {
        self.0.view_model()
    }

    pub fn downcast_ref<V: View>(&self) -> Option<&V> {
        self.view().as_any().downcast_ref::<V>()
    }

    pub fn is<V: View>(&self) -> bool {
        self.downcast_ref::<V>().is_some()
    }

    pub fn ptr_eq(&self, other: &ViewHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Notify the bound view-model that this view is now displayed
    pub(crate) fn attached(&self) {
        if let Some(view_model) = self.view_model() {
            view_model.attach_handlers();
        }
    }

    pub(crate) fn detached(&self) {
        if let Some(view_model) = self.view_model() {
            view_model.detach_handlers();
        }
    }
}

impl PartialEq for ViewHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ViewHandle {}

impl fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view_model = self
            .view_model()
            .map(|vm| vm.type_name())
            .unwrap_or("<unbound>");
        f.debug_struct("ViewHandle")
            .field("ptr", &Arc::as_ptr(&self.0).cast::<()>())
            .field("view_model", &view_model)
            .finish()
    }
}

/// General-purpose view that only records its view-model and size bound.
/// Toolkit bindings wrap or replace it with real controls.
pub struct BaseView<VM> {
    view_model: Option<Arc<VM>>,
    max_size: Option<Size>,
    _marker: PhantomData<fn() -> VM>,
}

impl<VM> Default for BaseView<VM> {
    fn default() -> Self {
        Self {
            view_model: None,
            max_size: None,
            _marker: PhantomData,
        }
    }
}

impl<VM: ViewModel> BaseView<VM> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bound(&self) -> Option<&Arc<VM>> {
        self.view_model.as_ref()
    }
}

impl<VM: ViewModel> View for BaseView<VM> {
    fn view_model(&self) -> Option<Arc<dyn ViewModel>> {
        self.view_model
            .clone()
            .map(|vm| vm as Arc<dyn ViewModel>)
    }

    fn set_max_size(&mut self, max: Size) {
        self.max_size = Some(max);
    }

    fn max_size(&self) -> Option<Size> {
        self.max_size
    }
}

impl<VM: ViewModel> BindView<VM> for BaseView<VM> {
    fn bind(&mut self, view_model: Arc<VM>) {
        self.view_model = Some(view_model);
    }
}
