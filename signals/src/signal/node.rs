use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, Weak};

use parking_lot::{Mutex, ReentrantMutex};

use crate::{
    broadcast::{Broadcast, BroadcastId, ListenerGuard},
    error::SignalError,
    signal::{Listener, Notification},
    subscription::SubscriptionGuard,
    task::TaskGuard,
};

/// The shared state behind every signal, whether it was created through a `Mut` or by an operator.
///
/// A node owns its upstream subscriptions and background tasks, so closing (or dropping) a
/// node tears down everything that feeds it.
pub(crate) struct Node<T> {
    /// `None` for cold signals
    memory: Option<RwLock<Option<T>>>,
    broadcast: Broadcast<Notification<T>>,
    /// Serializes submissions and listener registration for this signal. Reentrant so that a
    /// listener may subscribe to (or close) the signal that is currently delivering to it.
    turn: ReentrantMutex<()>,
    closed: AtomicBool,
    upstream: Mutex<Vec<SubscriptionGuard>>,
    tasks: Mutex<Vec<TaskGuard>>,
}

impl<T> Node<T>
where T: Clone + Send + Sync + 'static
{
    pub fn cold() -> Self { Self::build(None) }

    pub fn latest(seed: Option<T>) -> Self { Self::build(Some(RwLock::new(seed))) }

    /// A node that remembers values when `latest` is set
    pub fn derived(latest: bool) -> Self { if latest { Self::latest(None) } else { Self::cold() } }

    fn build(memory: Option<RwLock<Option<T>>>) -> Self {
        Self {
            memory,
            broadcast: Broadcast::new(),
            turn: ReentrantMutex::new(()),
            closed: AtomicBool::new(false),
            upstream: Mutex::new(Vec::new()),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn is_latest(&self) -> bool { self.memory.is_some() }

    pub fn is_closed(&self) -> bool { self.closed.load(Ordering::SeqCst) }

    pub fn id(&self) -> BroadcastId { self.broadcast.id() }

    pub fn listener_count(&self) -> usize { self.broadcast.listener_count() }

    pub fn peek(&self) -> Option<T> {
        self.memory.as_ref().and_then(|memory| memory.read().expect("memory lock is poisoned").clone())
    }

    pub fn emit(&self, value: T) -> Result<(), SignalError> {
        let _turn = self.turn.lock();
        if self.is_closed() {
            return Err(SignalError::Closed);
        }
        if let Some(memory) = &self.memory {
            *memory.write().expect("memory lock is poisoned") = Some(value.clone());
        }
        self.broadcast.send(Notification::Next(value));
        Ok(())
    }

    /// Close the node: release upstream subscriptions and tasks, deliver `Done`, then drop
    /// every listener. Returns false if the node was already closed.
    pub fn close(&self) -> bool {
        let _turn = self.turn.lock();
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        let upstream = std::mem::take(&mut *self.upstream.lock());
        drop(upstream);
        let tasks = std::mem::take(&mut *self.tasks.lock());
        drop(tasks);

        self.broadcast.send(Notification::Done);
        self.broadcast.clear();
        true
    }

    pub fn listen(&self, listener: Listener<T>) -> ListenerGuard<Notification<T>> {
        let _turn = self.turn.lock();
        if let Some(current) = self.peek() {
            listener(Notification::Next(current));
        }
        if self.is_closed() {
            tracing::debug!("observer attached to closed signal {}; replaying its end", self.id());
            listener(Notification::Done);
            return ListenerGuard::inert();
        }
        self.broadcast.reference().listen(listener)
    }

    /// Keep an upstream subscription alive for as long as this node is open
    pub fn retain(&self, guard: SubscriptionGuard) {
        if self.is_closed() {
            drop(guard);
            return;
        }
        self.upstream.lock().push(guard);
    }

    /// Tie a background task to the lifetime of this node
    pub fn own_task(&self, task: TaskGuard) {
        if self.is_closed() {
            task.abort();
            return;
        }
        self.tasks.lock().push(task);
    }
}

/// Deliver a notification into a node that may already be gone.
///
/// Operators hold their output weakly; a dropped or closed output silently ends delivery.
pub(crate) fn forward<T>(output: &Weak<Node<T>>, notification: Notification<T>)
where T: Clone + Send + Sync + 'static {
    let Some(node) = output.upgrade() else { return };
    match notification {
        Notification::Next(value) => {
            if node.emit(value).is_err() {
                tracing::trace!("dropping value for closed signal {}", node.id());
            }
        }
        Notification::Done => {
            node.close();
        }
    }
}
