use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::{
    operator::derive,
    signal::{
        node::{forward, Node},
        Notification,
    },
    Read,
};

impl<T> Read<T>
where T: Clone + Send + Sync + 'static
{
    /// Forward the first `count` values, then close
    pub fn take(&self, count: usize) -> Read<T> {
        if count == 0 {
            let node = Node::derived(self.is_latest());
            node.close();
            return Read(Arc::new(node));
        }
        let taken = AtomicUsize::new(0);
        derive(self, self.is_latest(), move |output| {
            move |notification: Notification<T>| match notification {
                Notification::Next(value) => {
                    let seen = taken.fetch_add(1, Ordering::SeqCst) + 1;
                    if seen > count {
                        return;
                    }
                    forward(&output, Notification::Next(value));
                    if seen == count {
                        forward(&output, Notification::Done);
                    }
                }
                Notification::Done => forward(&output, Notification::Done),
            }
        })
    }
}
