use std::future::Future;

use tokio::{runtime::Handle, task::JoinHandle};

/// Owning handle to a background task. Dropping it aborts the task.
#[must_use = "dropping a TaskGuard aborts the task"]
#[derive(Debug)]
pub struct TaskGuard(JoinHandle<()>);

impl TaskGuard {
    /// Abort the task now. Calling this more than once is a no-op.
    pub fn abort(&self) { self.0.abort(); }
}

impl Drop for TaskGuard {
    fn drop(&mut self) { self.0.abort(); }
}

/// A runtime handle captured when an operator is built, so timers and async stages
/// can be started from listener callbacks that run outside the runtime context.
#[derive(Clone, Debug)]
pub struct Spawner(Handle);

impl Spawner {
    /// Capture the current runtime. Panics when called outside of a tokio runtime.
    pub fn current() -> Self { Self(Handle::current()) }

    pub fn spawn<F>(&self, future: F) -> TaskGuard
    where F: Future<Output = ()> + Send + 'static {
        TaskGuard(self.0.spawn(future))
    }
}
