//! Building blocks shared by view-models and views
//!
//! Nothing in here knows how content is hosted; the navigation layer
//! drives these types through the traits defined below.

pub mod navigator;
pub mod result;
pub mod ui_action;
pub mod view;
pub mod view_model;

pub use navigator::Navigator;
pub use result::{ResultProvider, ResultSlot, ResultWaiter};
pub use ui_action::{ActionCommand, CommandParameter, UiAction};
pub use view::{BaseView, BindView, Size, View, ViewHandle};
pub use view_model::{AsAny, ViewModel, ViewModelCore};
