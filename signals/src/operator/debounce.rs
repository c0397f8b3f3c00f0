use std::{cell::RefCell, sync::Arc, time::Duration};

use parking_lot::ReentrantMutex;

use crate::{
    operator::derive,
    signal::{node::forward, Notification},
    task::{Spawner, TaskGuard},
    Read,
};

#[derive(Default)]
struct Pending {
    epoch: u64,
    timer: Option<TaskGuard>,
}

impl<T> Read<T>
where T: Clone + Send + Sync + 'static
{
    /// Emit a value only once `quiet` has passed without another value arriving.
    ///
    /// Each value restarts the timer and discards the one pending before it. A value still pending
    /// when the source closes is dropped. Must be called within a tokio runtime.
    pub fn debounce(&self, quiet: Duration) -> Read<T> {
        let spawner = Spawner::current();
        let pending = Arc::new(ReentrantMutex::new(RefCell::new(Pending::default())));
        derive(self, self.is_latest(), move |output| {
            move |notification: Notification<T>| match notification {
                Notification::Next(value) => {
                    // the deadline counts from arrival, not from when the timer task first runs
                    let deadline = tokio::time::Instant::now() + quiet;
                    let guard = pending.lock();
                    let epoch = {
                        let mut pending = guard.borrow_mut();
                        pending.epoch += 1;
                        pending.epoch
                    };
                    let timer = {
                        let pending = Arc::downgrade(&pending);
                        let output = output.clone();
                        spawner.spawn(async move {
                            tokio::time::sleep_until(deadline).await;
                            let Some(pending) = pending.upgrade() else { return };
                            let pending = pending.lock();
                            if pending.borrow().epoch == epoch {
                                forward(&output, Notification::Next(value));
                            }
                        })
                    };
                    let reset = guard.borrow_mut().timer.replace(timer);
                    drop(reset);
                }
                Notification::Done => {
                    let timer = pending.lock().borrow_mut().timer.take();
                    drop(timer);
                    forward(&output, Notification::Done);
                }
            }
        })
    }
}
