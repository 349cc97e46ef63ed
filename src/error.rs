//! Error taxonomy for navigation and overlay presentation

use thiserror::Error;

/// Result alias used by every navigation operation
pub type Result<T> = std::result::Result<T, NavigationError>;

#[derive(Debug, Error)]
pub enum NavigationError {
    /// The service provider has no registration for the requested view-model type
    #[error("view-model of type `{0}` is not registered")]
    ViewModelNotRegistered(&'static str),

    /// The view-model type was never paired with a view
    #[error("no view registered for view-model `{0}`")]
    MappingNotFound(&'static str),

    /// The registered view factory could not produce a view
    #[error("unable to construct view for `{view_model}`: {reason}")]
    ViewConstruction {
        view_model: &'static str,
        reason: String,
    },

    #[error("unable to find current view")]
    NoActiveView,

    #[error("unable to find a display surface")]
    NoDisplaySurface,

    #[error("unable to find an overlay layer for hosting the view")]
    NoOverlayLayer,

    /// Another overlay is already attached and exclusive overlays are enabled
    #[error("an overlay is already being presented")]
    OverlayBusy,

    #[error("operation `{0}` is not supported")]
    NotSupported(&'static str),

    /// A view-model tried to reach its navigator before one was assigned
    #[error("navigation service should be initialized")]
    NavigatorNotSet,

    /// The awaited result future failed (or its task panicked)
    #[error("awaited result faulted: {0:#}")]
    ResultFaulted(anyhow::Error),

    /// The result slot was dropped before anyone completed it
    #[error("result was abandoned before completion")]
    ResultAbandoned,

    #[error("UI dispatcher is no longer running")]
    DispatcherClosed,

    /// A job panicked while running on the UI dispatcher
    #[error("UI job panicked: {0}")]
    JobPanicked(String),
}

impl NavigationError {
    /// True for the two conditions `ask_for_action` reports as "nothing shown"
    pub fn is_missing_surface(&self) -> bool {
        matches!(self, NavigationError::NoActiveView | NavigationError::NoDisplaySurface)
    }
}
