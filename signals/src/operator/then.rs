use std::{
    future::Future,
    sync::{Arc, Weak},
};

use futures::stream::{FuturesUnordered, StreamExt};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::{
    operator::attach,
    signal::{
        node::{forward, Node},
        Notification,
    },
    task::Spawner,
    Mut, Read, WeakMut,
};

impl<T> Read<T>
where T: Clone + Send + Sync + 'static
{
    /// Start `transform(value)` for every value and emit each result when its future resolves.
    ///
    /// Every value gets its own future; none is cancelled when a newer value arrives. Futures
    /// start in arrival order and results are emitted in completion order. When the source closes,
    /// futures still in flight are abandoned and the output closes; dropping the output does the
    /// same. The output is cold. Must be called within a tokio runtime.
    pub fn then<U, F, Fut>(&self, transform: F) -> Read<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        self.run_async(None, transform)
    }

    /// [`then`](Self::then), with `busy` set to `true` as soon as a value arrives and back to
    /// `false` right after its result has been emitted.
    ///
    /// Abandoned operations also report `false`. `busy` is held weakly; count transitions when
    /// several operations may overlap.
    pub fn bracket<U, F, Fut>(&self, busy: &Mut<bool>, transform: F) -> Read<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        self.run_async(Some(busy.downgrade()), transform)
    }

    fn run_async<U, F, Fut>(&self, busy: Option<WeakMut<bool>>, transform: F) -> Read<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        let node = Arc::new(Node::cold());
        let (tx, rx) = mpsc::unbounded_channel();
        // operations started but not yet delivered or abandoned
        let pending = Arc::new(Mutex::new(0usize));
        node.own_task(Spawner::current().spawn(run_worker(rx, transform, busy.clone(), pending.clone(), Arc::downgrade(&node))));

        let sender = Mutex::new(Some(tx));
        attach(self, node, move |output| {
            move |notification: Notification<T>| match notification {
                Notification::Next(value) => {
                    let Some(sender) = sender.lock().clone() else { return };
                    *pending.lock() += 1;
                    if let Some(busy) = &busy {
                        let _ = busy.try_set(true);
                    }
                    let _ = sender.send(value);
                }
                Notification::Done => {
                    drop(sender.lock().take());
                    let abandoned = std::mem::take(&mut *pending.lock());
                    if abandoned > 0 {
                        tracing::debug!("source closed with {abandoned} operations in flight; abandoning them");
                    }
                    if let Some(busy) = &busy {
                        for _ in 0..abandoned {
                            let _ = busy.try_set(false);
                        }
                    }
                    // closing the output aborts the worker
                    forward(&output, Notification::Done);
                }
            }
        })
    }
}

async fn run_worker<T, U, F, Fut>(
    mut values: mpsc::UnboundedReceiver<T>,
    transform: F,
    busy: Option<WeakMut<bool>>,
    pending: Arc<Mutex<usize>>,
    output: Weak<Node<U>>,
) where
    U: Clone + Send + Sync + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = U>,
{
    let mut in_flight = FuturesUnordered::new();
    loop {
        tokio::select! {
            biased;
            received = values.recv() => match received {
                Some(value) => in_flight.push(transform(value)),
                None => return,
            },
            Some(result) = in_flight.next(), if !in_flight.is_empty() => {
                if claim(&pending) {
                    deliver(&output, busy.as_ref(), result);
                }
            }
        }
    }
}

/// Take one pending operation for delivery. False once the source has closed and abandoned it.
fn claim(pending: &Mutex<usize>) -> bool {
    let mut pending = pending.lock();
    if *pending == 0 {
        return false;
    }
    *pending -= 1;
    true
}

fn deliver<U>(output: &Weak<Node<U>>, busy: Option<&WeakMut<bool>>, result: U)
where U: Clone + Send + Sync + 'static {
    forward(output, Notification::Next(result));
    if let Some(busy) = busy {
        let _ = busy.try_set(false);
    }
}
