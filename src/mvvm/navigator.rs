use async_trait::async_trait;

use crate::error::Result;
use crate::mvvm::UiAction;

/// The part of a navigation controller a view-model can reach through its
/// back-reference. Generic operations live on the concrete controller.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Return to the previous root content; no-op when there is no history
    async fn navigate_back(&self) -> Result<()>;

    /// Re-activate the oldest history entry; no-op when there is no history
    async fn navigate_to_root(&self) -> Result<()>;

    /// Dismiss the active screen
    async fn close(&self) -> Result<()>;

    /// Present a choice dialog and wait for the user's pick
    async fn ask_for_action(
        &self,
        title: &str,
        description: &str,
        actions: Vec<UiAction>,
    ) -> Result<Option<UiAction>>;
}
