use crate::error::Result;
use crate::mvvm::{ResultSlot, UiAction};

/// Lightweight choice presenter shown by `ask_for_action`.
///
/// Only the first selection counts; anything after that is ignored.
#[derive(Default)]
pub struct ActionDialog {
    title: String,
    description: String,
    actions: Vec<UiAction>,
    result: ResultSlot<UiAction>,
}

impl ActionDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the displayed content; done once, before the dialog is hosted
    pub fn initialize(&mut self, title: impl Into<String>, description: impl Into<String>, actions: Vec<UiAction>) {
        self.title = title.into();
        self.description = description.into();
        self.actions = actions;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn actions(&self) -> &[UiAction] {
        &self.actions
    }

    /// Select the action at `index`. False if out of range or already resolved.
    pub fn select(&self, index: usize) -> bool {
        match self.actions.get(index) {
            Some(action) => self.result.try_set(action.clone()),
            None => false,
        }
    }

    /// Select the first action with the given title
    pub fn select_title(&self, title: &str) -> bool {
        match self.actions.iter().find(|action| action.title == title) {
            Some(action) => self.result.try_set(action.clone()),
            None => false,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.result.is_set()
    }

    /// Resolves with the selected action. There is no timeout.
    pub async fn get_result(&self) -> Result<UiAction> {
        self.result.wait().await
    }
}
