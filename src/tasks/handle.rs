//! Cancel handles for spawned background tasks

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::debug;

/// Owned handle to a spawned task. Cancelling or dropping it aborts the task.
#[derive(Debug)]
pub struct TaskHandle {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl TaskHandle {
    pub fn spawn<F>(name: &'static str, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        debug!("Spawning {} task", name);
        Self {
            name,
            handle: tokio::spawn(future),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Abort the task; it will not be polled again
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!("Cancelling {} task", self.name);
            self.handle.abort();
        }
    }
}
