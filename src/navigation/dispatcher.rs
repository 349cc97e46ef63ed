//! Serial UI scheduler
//!
//! A single tokio task owns the UI state and applies queued jobs one at a
//! time, in submission order. Callers on any task either wait for a job's
//! return value (`invoke`) or fire and forget (`post`). A panicking job is
//! contained to that job; the task keeps draining the queue.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, warn};
use tokio::sync::{mpsc, oneshot};

use crate::error::{NavigationError, Result};

type Job<S> = Box<dyn FnOnce(&mut S) + Send>;

pub struct UiDispatcher<S> {
    jobs: mpsc::UnboundedSender<Job<S>>,
}

impl<S> Clone for UiDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
        }
    }
}

impl<S: Send + 'static> UiDispatcher<S> {
    /// Move `state` onto a new task and start draining jobs.
    ///
    /// Must be called from within a tokio runtime. The task exits once every
    /// dispatcher clone has been dropped.
    pub fn spawn(state: S) -> Self {
        let (jobs, mut queue) = mpsc::unbounded_channel::<Job<S>>();
        tokio::spawn(async move {
            let mut state = state;
            while let Some(job) = queue.recv().await {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| job(&mut state))) {
                    warn!("UI job panicked: {}", panic_message(payload.as_ref()));
                }
            }
            debug!("UI dispatcher stopped");
        });
        Self { jobs }
    }

    /// Queue `job` and wait for its result.
    ///
    /// A panic inside `job` comes back as [`NavigationError::JobPanicked`];
    /// whatever the job changed before panicking stays applied.
    pub async fn invoke<R, F>(&self, job: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut S) -> R + Send + 'static,
    {
        let (reply, result) = oneshot::channel();
        self.post(move |state| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| job(state)))
                .map_err(|payload| NavigationError::JobPanicked(panic_message(payload.as_ref())));
            let _ = reply.send(outcome);
        })?;
        result.await.map_err(|_| NavigationError::DispatcherClosed)?
    }

    /// Queue `job` without waiting for it to run
    pub fn post<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.jobs
            .send(Box::new(job))
            .map_err(|_| NavigationError::DispatcherClosed)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
