use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::{
    signal::{
        node::{forward, Node},
        Listener, Notification, Signal,
    },
    Read,
};

/// Emit every value from every source in arrival order. The output remembers its latest value
/// if any source does, and closes once all sources have closed.
pub fn merge<T, I>(sources: I) -> Read<T>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Read<T>>,
{
    let sources: Vec<Read<T>> = sources.into_iter().collect();
    let node = Arc::new(Node::derived(sources.iter().any(Read::is_latest)));
    if sources.is_empty() {
        node.close();
        return Read(node);
    }

    let remaining = Arc::new(AtomicUsize::new(sources.len()));
    for source in &sources {
        let output = Arc::downgrade(&node);
        let remaining = remaining.clone();
        let listener: Listener<T> = Arc::new(move |notification: Notification<T>| match notification {
            Notification::Next(value) => forward(&output, Notification::Next(value)),
            Notification::Done => {
                if remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                    forward(&output, Notification::Done);
                }
            }
        });
        node.retain(source.listen(listener));
    }
    Read(node)
}

impl<T> Read<T>
where T: Clone + Send + Sync + 'static
{
    /// Merge this signal with `other`
    pub fn merge_with(&self, other: &Read<T>) -> Read<T> { merge([self.clone(), other.clone()]) }
}
