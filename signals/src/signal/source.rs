//! Bridges between signals and async values: futures and streams in, streams out.

use std::{
    future::Future,
    sync::{Arc, Weak},
};

use futures::stream::{self, BoxStream, Stream, StreamExt};
use tokio::sync::mpsc;

use crate::{
    signal::{
        node::{forward, Node},
        Notification, Signal,
    },
    task::{Spawner, TaskGuard},
    Mut, Read,
};

impl<T> Read<T>
where T: Clone + Send + Sync + 'static
{
    /// A latest-value signal that emits what `future` resolves to, then closes.
    ///
    /// The future runs on a task owned by the signal. Dropping the last handle before it resolves
    /// aborts it, and the result is never delivered. Must be called within a tokio runtime; use
    /// [`from_future_on`](Self::from_future_on) elsewhere.
    pub fn from_future<F>(future: F) -> Self
    where F: Future<Output = T> + Send + 'static {
        Self::from_future_on(&Spawner::current(), future)
    }

    /// [`from_future`](Self::from_future) on a runtime captured earlier
    pub fn from_future_on<F>(spawner: &Spawner, future: F) -> Self
    where F: Future<Output = T> + Send + 'static {
        let node = Arc::new(Node::latest(None));
        let output = Arc::downgrade(&node);
        node.own_task(spawner.spawn(async move {
            let value = future.await;
            forward(&output, Notification::Next(value));
            forward(&output, Notification::Done);
        }));
        Read(node)
    }

    /// A latest-value signal that emits every item of `stream` and closes when it ends
    pub fn from_stream<S>(stream: S) -> Self
    where S: Stream<Item = T> + Send + 'static {
        Self::from_stream_on(&Spawner::current(), stream)
    }

    pub fn from_stream_on<S>(spawner: &Spawner, stream: S) -> Self
    where S: Stream<Item = T> + Send + 'static {
        let node = Arc::new(Node::latest(None));
        let output = Arc::downgrade(&node);
        node.own_task(spawner.spawn(async move {
            pump(stream, &output).await;
            forward(&output, Notification::Done);
        }));
        Read(node)
    }

    /// A signal that never emits and never closes
    pub fn pending() -> Self { Read(Arc::new(Node::cold())) }

    /// A signal that holds `value` and is already closed
    pub fn once(value: T) -> Self {
        let node = Node::latest(Some(value));
        node.close();
        Read(Arc::new(node))
    }

    /// Every value from now on (starting with the current one for latest-value signals), ending
    /// when the signal closes. The stream keeps its subscription until it is dropped.
    pub fn into_stream(&self) -> BoxStream<'static, T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let guard = self.listen(Arc::new(move |notification: Notification<T>| {
            let _ = tx.send(notification);
        }));
        stream::unfold((rx, guard), |(mut rx, guard)| async move {
            match rx.recv().await {
                Some(Notification::Next(value)) => Some((value, (rx, guard))),
                _ => None,
            }
        })
        .boxed()
    }
}

impl<T> Mut<T>
where T: Clone + Send + Sync + 'static
{
    /// Submit every item of `stream` to this port until the stream ends or the port closes.
    ///
    /// The task holds the port weakly; the stream ending does not close it. Dropping the returned
    /// guard stops the feed. Must be called within a tokio runtime.
    pub fn feed<S>(&self, stream: S) -> TaskGuard
    where S: Stream<Item = T> + Send + 'static {
        self.feed_on(&Spawner::current(), stream)
    }

    pub fn feed_on<S>(&self, spawner: &Spawner, stream: S) -> TaskGuard
    where S: Stream<Item = T> + Send + 'static {
        let output = Arc::downgrade(&self.0);
        spawner.spawn(async move { pump(stream, &output).await })
    }
}

async fn pump<T, S>(stream: S, output: &Weak<Node<T>>)
where
    T: Clone + Send + Sync + 'static,
    S: Stream<Item = T>,
{
    let mut stream = std::pin::pin!(stream);
    while let Some(item) = stream.next().await {
        let Some(node) = output.upgrade() else { return };
        if node.emit(item).is_err() {
            return;
        }
    }
}
