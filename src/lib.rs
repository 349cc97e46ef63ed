pub mod config;
pub mod error;
pub mod mvvm;
pub mod navigation;

pub use config::NavigationConfig;
pub use error::{NavigationError, Result};
pub use navigation::NavigationController;
