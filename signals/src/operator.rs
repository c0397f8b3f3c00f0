//! Operators over read ports.
//!
//! Every operator is eager: it builds an output node, subscribes that node to its source(s)
//! right away and returns a [`Read`] of the output. The output owns the upstream subscriptions
//! (and any timers or tasks), while the upstream listener only holds the output weakly. When
//! the last handle to an output goes away, or the output closes, its whole upstream chain is
//! released.

mod debounce;
mod filter;
mod map;
mod merge;
mod switch;
mod take;
mod then;

pub use merge::merge;

use std::sync::{Arc, Weak};

use crate::{
    signal::{node::Node, Listener, Notification, Signal},
    Read,
};

/// Build an operator node fed by `source`. `listener` receives a weak handle to the output and
/// returns the callback to attach upstream.
pub(crate) fn derive<T, U, L, F>(source: &Read<T>, latest: bool, listener: L) -> Read<U>
where
    T: Clone + Send + Sync + 'static,
    U: Clone + Send + Sync + 'static,
    L: FnOnce(Weak<Node<U>>) -> F,
    F: Fn(Notification<T>) + Send + Sync + 'static,
{
    attach(source, Arc::new(Node::derived(latest)), listener)
}

/// Same as [`derive`] for an output node that was built by the caller
pub(crate) fn attach<T, U, L, F>(source: &Read<T>, node: Arc<Node<U>>, listener: L) -> Read<U>
where
    T: Clone + Send + Sync + 'static,
    U: Clone + Send + Sync + 'static,
    L: FnOnce(Weak<Node<U>>) -> F,
    F: Fn(Notification<T>) + Send + Sync + 'static,
{
    let callback: Listener<T> = Arc::new(listener(Arc::downgrade(&node)));
    let guard = source.listen(callback);
    node.retain(guard);
    Read(node)
}
