use std::sync::Arc;

use crate::{
    porcelain::{Subscribe, SubscriptionGuard},
    signal::{node::Node, Listener, Peek, Signal},
};

/// Read port of a signal: it can be observed and derived from, never written or closed.
///
/// Cloning is cheap and every clone observes the same signal. Operators (`map`, `switch_latest`,
/// `merge`, ...) are inherent methods defined alongside their implementations in `operator`.
pub struct Read<T>(pub(crate) Arc<Node<T>>);

impl<T> Clone for Read<T> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Read<T>
where T: Clone + Send + Sync + 'static
{
    /// Register a callback for each value. Alias of [`Subscribe::subscribe`].
    pub fn observe<F>(&self, callback: F) -> SubscriptionGuard
    where F: Fn(T) + Send + Sync + 'static {
        self.subscribe(callback)
    }

    /// Whether new observers receive the latest value on attach
    pub fn is_latest(&self) -> bool { self.0.is_latest() }

    pub fn is_closed(&self) -> bool { self.0.is_closed() }

    /// Number of listeners attached right now
    pub fn observer_count(&self) -> usize { self.0.listener_count() }
}

impl<T> Signal<T> for Read<T>
where T: Clone + Send + Sync + 'static
{
    fn listen(&self, listener: Listener<T>) -> SubscriptionGuard {
        // the guard unregisters first, then releases its hold on the source
        SubscriptionGuard::new((self.0.listen(listener), self.clone()))
    }
}

impl<T> Peek<T> for Read<T>
where T: Clone + Send + Sync + 'static
{
    fn peek(&self) -> Option<T> { self.0.peek() }
}

impl<T> std::fmt::Debug for Read<T>
where T: Clone + Send + Sync + std::fmt::Debug + 'static
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Read").field("id", &self.0.id()).field("value", &self.0.peek()).field("closed", &self.0.is_closed()).finish()
    }
}
