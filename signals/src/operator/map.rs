use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    operator::{attach, derive},
    signal::{
        node::{forward, Node},
        Notification,
    },
    Read,
};

impl<T> Read<T>
where T: Clone + Send + Sync + 'static
{
    /// Emit `transform(value)` for every value
    pub fn map<U, F>(&self, transform: F) -> Read<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        derive(self, self.is_latest(), move |output| {
            move |notification: Notification<T>| match notification {
                Notification::Next(value) => forward(&output, Notification::Next(transform(value))),
                Notification::Done => forward(&output, Notification::Done),
            }
        })
    }

    /// Fallible map. The first error is emitted as a final `Err` value and the output closes;
    /// the failure never escapes into the delivering pipeline.
    pub fn try_map<U, E, F>(&self, transform: F) -> Read<Result<U, E>>
    where
        U: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
        F: Fn(T) -> Result<U, E> + Send + Sync + 'static,
    {
        derive(self, self.is_latest(), move |output| {
            move |notification: Notification<T>| match notification {
                Notification::Next(value) => match transform(value) {
                    Ok(mapped) => forward(&output, Notification::Next(Ok(mapped))),
                    Err(err) => {
                        forward(&output, Notification::Next(Err(err)));
                        forward(&output, Notification::Done);
                    }
                },
                Notification::Done => forward(&output, Notification::Done),
            }
        })
    }

    /// Fold every value into `state` and emit what `step` returns
    pub fn scan<S, U, F>(&self, initial: S, step: F) -> Read<U>
    where
        S: Send + 'static,
        U: Clone + Send + Sync + 'static,
        F: Fn(&mut S, T) -> U + Send + Sync + 'static,
    {
        let state = Mutex::new(initial);
        derive(self, self.is_latest(), move |output| {
            move |notification: Notification<T>| match notification {
                Notification::Next(value) => {
                    let next = step(&mut state.lock(), value);
                    forward(&output, Notification::Next(next));
                }
                Notification::Done => forward(&output, Notification::Done),
            }
        })
    }

    /// Latest-value signal that holds `seed` until the source emits, then follows the source
    pub fn start_with(&self, seed: T) -> Read<T> {
        attach(self, Arc::new(Node::latest(Some(seed))), |output| move |notification: Notification<T>| forward(&output, notification))
    }
}
