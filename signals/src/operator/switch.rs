use std::{cell::RefCell, sync::Arc};

use parking_lot::ReentrantMutex;

use crate::{
    operator::derive,
    porcelain::SubscriptionGuard,
    signal::{node::forward, Listener, Notification, Signal},
    Read,
};

/// The single live inner subscription of a `switch_latest`, tagged by the outer value it serves
#[derive(Default)]
struct Active {
    epoch: u64,
    inner: Option<SubscriptionGuard>,
}

impl<T> Read<T>
where T: Clone + Send + Sync + 'static
{
    /// For every value, subscribe to the signal `select` returns and forward what it emits,
    /// after disposing of the previous inner signal.
    ///
    /// At most one inner signal is live at any instant. Anything a superseded inner delivers after
    /// the switch (a late async result, say) is dropped, including when it races the switch from
    /// another thread. The output closes when this signal closes; inner completion does not close it.
    pub fn switch_latest<U, F>(&self, select: F) -> Read<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> Read<U> + Send + Sync + 'static,
    {
        let active = Arc::new(ReentrantMutex::new(RefCell::new(Active::default())));
        derive(self, self.is_latest(), move |output| {
            move |notification: Notification<T>| match notification {
                Notification::Next(value) => {
                    let (epoch, previous) = {
                        let active = active.lock();
                        let mut active = active.borrow_mut();
                        active.epoch += 1;
                        (active.epoch, active.inner.take())
                    };
                    // cancel before the next inner starts
                    drop(previous);

                    let inner = select(value);
                    let listener: Listener<U> = {
                        let active = Arc::downgrade(&active);
                        let output = output.clone();
                        Arc::new(move |notification: Notification<U>| {
                            let Some(active) = active.upgrade() else { return };
                            let active = active.lock();
                            if active.borrow().epoch != epoch {
                                tracing::trace!("dropping notification from superseded inner signal");
                                return;
                            }
                            if let Notification::Next(value) = notification {
                                forward(&output, Notification::Next(value));
                            }
                        })
                    };
                    let guard = inner.listen(listener);

                    let active = active.lock();
                    let stale = {
                        let mut active = active.borrow_mut();
                        if active.epoch == epoch {
                            active.inner = Some(guard);
                            None
                        } else {
                            // a reentrant outer value already replaced us during the replay
                            Some(guard)
                        }
                    };
                    drop(stale);
                }
                Notification::Done => {
                    let current = active.lock().borrow_mut().inner.take();
                    drop(current);
                    forward(&output, Notification::Done);
                }
            }
        })
    }
}
