use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Argument handed to an action's command
pub type CommandParameter = Arc<dyn Any + Send + Sync>;

/// Callback run when an action is executed
pub type ActionCommand = Arc<dyn Fn(Option<&CommandParameter>) + Send + Sync>;

/// One user-selectable choice in an action dialog (e.g. "Yes", "No", "Cancel")
#[derive(Clone)]
pub struct UiAction {
    pub title: String,
    /// None for actions that only close the dialog
    pub command: Option<ActionCommand>,
    pub command_parameter: Option<CommandParameter>,
}

impl UiAction {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            command: None,
            command_parameter: None,
        }
    }

    pub fn with_command<F>(mut self, command: F) -> Self
    where
        F: Fn(Option<&CommandParameter>) + Send + Sync + 'static,
    {
        self.command = Some(Arc::new(command));
        self
    }

    pub fn with_parameter<P: Any + Send + Sync>(mut self, parameter: P) -> Self {
        self.command_parameter = Some(Arc::new(parameter));
        self
    }

    /// Run the command with its parameter. Returns false if there is no command.
    pub fn execute(&self) -> bool {
        match &self.command {
            Some(command) => {
                command(self.command_parameter.as_ref());
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for UiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiAction")
            .field("title", &self.title)
            .field("command", &self.command.is_some())
            .field("command_parameter", &self.command_parameter.is_some())
            .finish()
    }
}
