use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, Weak};

use log::debug;
use tokio::sync::watch;

use crate::error::{NavigationError, Result};
use crate::mvvm::Navigator;

/// Upcast helper so trait objects can be downcast back to their concrete type
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A screen's behaviour and state.
///
/// Implementors embed a [`ViewModelCore`] and expose it through `core()`.
/// The lifecycle hooks default to no-ops:
/// - `attach_handlers` / `detach_handlers` run when a view bound to this
///   view-model becomes, or stops being, visible content
/// - `dispose` runs when the registry evicts the instance in favour of a fresh one
pub trait ViewModel: AsAny {
    fn core(&self) -> &ViewModelCore;

    fn attach_handlers(&self) {}

    fn detach_handlers(&self) {}

    fn dispose(&self) {}

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// State every view-model carries: busy flag, result expectation and the
/// back-reference to the navigator that owns it
pub struct ViewModelCore {
    busy: watch::Sender<bool>,
    expects_result: AtomicBool,
    navigator: RwLock<Option<Weak<dyn Navigator>>>,
}

impl Default for ViewModelCore {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewModelCore {
    pub fn new() -> Self {
        let (busy, _) = watch::channel(false);
        Self {
            busy,
            expects_result: AtomicBool::new(false),
            navigator: RwLock::new(None),
        }
    }

    /// Create a core that already knows its navigator
    pub fn with_navigator(navigator: Weak<dyn Navigator>) -> Self {
        let core = Self::new();
        core.set_navigator(navigator);
        core
    }

    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    /// Update the busy flag. Subscribers are only notified when the value changes.
    pub fn set_busy(&self, busy: bool) {
        let changed = self.busy.send_if_modified(|current| {
            if *current == busy {
                false
            } else {
                *current = busy;
                true
            }
        });
        if changed {
            debug!("busy -> {}", busy);
        }
    }

    /// Watch busy changes; the receiver sees the current value immediately
    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    pub fn expects_result(&self) -> bool {
        self.expects_result.load(Ordering::SeqCst)
    }

    pub fn set_expects_result(&self, expects: bool) {
        self.expects_result.store(expects, Ordering::SeqCst);
    }

    pub fn set_navigator(&self, navigator: Weak<dyn Navigator>) {
        *self.navigator.write().unwrap() = Some(navigator);
    }

    pub fn has_navigator(&self) -> bool {
        self.navigator
            .read()
            .unwrap()
            .as_ref()
            .is_some_and(|navigator| navigator.strong_count() > 0)
    }

    /// The owning navigator. Fails if none was assigned or it has been dropped.
    pub fn navigator(&self) -> Result<Arc<dyn Navigator>> {
        self.navigator
            .read()
            .unwrap()
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or(NavigationError::NavigatorNotSet)
    }

    /// Back command: ask the owning navigator to return to the previous screen
    pub async fn go_back(&self) -> Result<()> {
        self.navigator()?.navigate_back().await
    }
}
