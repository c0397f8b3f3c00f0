use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

/// A unique identifier for a broadcast that cannot be forged or extracted.
/// Can only be created by a Broadcast and used for deduplication/comparison.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BroadcastId(usize);

impl From<BroadcastId> for usize {
    fn from(id: BroadcastId) -> Self { id.0 }
}
impl std::fmt::Display for BroadcastId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// A listener that is called with every broadcast payload.
#[derive(Clone)]
pub struct BroadcastListener<T = ()>(Arc<dyn Fn(T) + Send + Sync + 'static>);

/// Trait for types that can be converted into broadcast listeners.
pub trait IntoBroadcastListener<T> {
    /// Convert this type into a listener function that can be called on notifications.
    fn into_broadcast_listener(self) -> BroadcastListener<T>;
}

/// A broadcast sender that delivers each payload to every registered listener.
///
/// Listeners are invoked synchronously, in registration order, on the sending thread.
#[derive(Clone)]
pub struct Broadcast<T = ()>(Arc<Inner<T>>);

struct Inner<T> {
    // BTreeMap keyed by a monotonic id keeps delivery in registration order
    listeners: std::sync::RwLock<BTreeMap<usize, BroadcastListener<T>>>,
    next_id: AtomicUsize,
}

impl<T> std::fmt::Debug for Broadcast<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcast").field("listeners", &self.listener_count()).finish()
    }
}

/// A listen-only reference to a broadcast
pub struct Ref<'a, T>(&'a Broadcast<T>);

/// A handle that unsubscribes its listener when dropped.
pub struct ListenerGuard<T = ()> {
    inner: Weak<Inner<T>>,
    id: usize,
}

impl<T> ListenerGuard<T> {
    /// A guard not registered with any broadcast
    pub(crate) fn inert() -> Self { Self { inner: Weak::new(), id: 0 } }
}

impl<T> Default for Broadcast<T>
where T: Clone
{
    fn default() -> Self { Self::new() }
}

impl<T> Broadcast<T> {
    /// Number of listeners currently registered
    pub fn listener_count(&self) -> usize { self.0.listeners.read().expect("listeners lock is poisoned").len() }

    /// Drop every registered listener. Guards that are still held become no-ops.
    pub fn clear(&self) {
        // take the map out first so listener destructors run without the lock held
        let listeners = std::mem::take(&mut *self.0.listeners.write().expect("listeners lock is poisoned"));
        drop(listeners);
    }
}

impl<T> Broadcast<T>
where T: Clone
{
    /// Creates a new Broadcast struct
    pub fn new() -> Self { Self(Arc::new(Inner { listeners: std::sync::RwLock::new(BTreeMap::new()), next_id: AtomicUsize::new(0) })) }

    /// Get the unique identifier for this broadcast
    pub fn id(&self) -> BroadcastId { BroadcastId(Arc::as_ptr(&self.0) as *const () as usize) }

    /// Sends a notification to all active listeners
    pub fn send(&self, value: T) {
        // Clone the listeners to avoid holding the lock during callback execution
        let subscribers = {
            let listeners = self.0.listeners.read().expect("listeners lock is poisoned");
            listeners.values().cloned().collect::<Vec<_>>()
        };

        // clone the value for each subscriber except the last one
        if let Some((last, rest)) = subscribers.split_last() {
            for BroadcastListener(callback) in rest {
                callback(value.clone());
            }
            (last.0)(value);
        }
    }

    /// Get a read-only reference to this sender that can only subscribe to notifications.
    /// This avoids cloning the sender while still forbidding the user from sending notifications.
    pub fn reference(&self) -> Ref<'_, T> { Ref(self) }
}

impl<T> Ref<'_, T> {
    /// Subscribe to notifications from the associated sender.
    pub fn listen<L>(&self, listener: L) -> ListenerGuard<T>
    where L: IntoBroadcastListener<T> {
        let id = self.0.0.next_id.fetch_add(1, Ordering::Relaxed);
        self.0.0.listeners.write().expect("listeners lock is poisoned").insert(id, listener.into_broadcast_listener());
        ListenerGuard { inner: Arc::downgrade(&self.0.0), id }
    }
}

impl<T> Drop for ListenerGuard<T> {
    /// Automatically unsubscribes when the subscription handle is dropped.
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            let removed = inner.listeners.write().expect("listeners lock is poisoned").remove(&self.id);
            // the listener may own guards of its own; release it outside the lock
            drop(removed);
        }
    }
}

impl<F, T> IntoBroadcastListener<T> for F
where F: Fn(T) + Send + Sync + 'static
{
    fn into_broadcast_listener(self) -> BroadcastListener<T> { BroadcastListener(Arc::new(self)) }
}

impl<T> IntoBroadcastListener<T> for BroadcastListener<T> {
    fn into_broadcast_listener(self) -> BroadcastListener<T> { self }
}

impl<T> IntoBroadcastListener<T> for Arc<dyn Fn(T) + Send + Sync + 'static> {
    fn into_broadcast_listener(self) -> BroadcastListener<T> { BroadcastListener(self) }
}

impl<T> IntoBroadcastListener<T> for tokio::sync::mpsc::UnboundedSender<T>
where T: Send + Sync + 'static
{
    fn into_broadcast_listener(self) -> BroadcastListener<T> {
        BroadcastListener(Arc::new(move |value| {
            let _ = self.send(value); // receiver gone means nobody is listening anymore
        }))
    }
}
