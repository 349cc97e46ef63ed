//! Single-assignment results handed from a transient screen back to its presenter

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::{NavigationError, Result};
use crate::mvvm::ViewModel;

/// Capability of a view-model that can be shown for a result.
///
/// The future resolves once, when the view-model has a value to hand back.
/// Returning an error faults the presentation; the overlay is still removed.
#[async_trait]
pub trait ResultProvider<R: Send + 'static>: ViewModel {
    async fn get_result(&self) -> anyhow::Result<R>;
}

/// A completion slot that can be filled exactly once.
///
/// The first `try_set` wins; later calls are ignored. Any number of waiters
/// may observe the value.
pub struct ResultSlot<R> {
    value: watch::Sender<Option<R>>,
}

impl<R: Clone + Send + Sync> Default for ResultSlot<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone + Send + Sync> ResultSlot<R> {
    pub fn new() -> Self {
        let (value, _) = watch::channel(None);
        Self { value }
    }

    /// Fill the slot. Returns false if it was already filled.
    pub fn try_set(&self, value: R) -> bool {
        let mut pending = Some(value);
        self.value.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = pending.take();
            true
        })
    }

    pub fn is_set(&self) -> bool {
        self.value.borrow().is_some()
    }

    /// Owned waiter that outlives borrows of the slot
    pub fn waiter(&self) -> ResultWaiter<R> {
        ResultWaiter {
            value: self.value.subscribe(),
        }
    }

    pub async fn wait(&self) -> Result<R> {
        self.waiter().wait().await
    }
}

pub struct ResultWaiter<R> {
    value: watch::Receiver<Option<R>>,
}

impl<R: Clone + Send + Sync> ResultWaiter<R> {
    /// Resolves with the slot's value. Fails with `ResultAbandoned` if the slot
    /// is dropped while still empty.
    pub async fn wait(mut self) -> Result<R> {
        let value = self
            .value
            .wait_for(Option::is_some)
            .await
            .map_err(|_| NavigationError::ResultAbandoned)?;
        value.clone().ok_or(NavigationError::ResultAbandoned)
    }
}
