use std::sync::Arc;

use crate::{
    signal::{Notification, Signal},
    Read,
};

/// Trait for waiting on signal values asynchronously
pub trait Wait<T: 'static> {
    /// Wait for the signal to hold a specific value. Resolves to false if the signal closes first.
    fn wait_value(&self, target_value: T) -> impl std::future::Future<Output = bool> + Send
    where T: PartialEq + Clone + Send + Sync;

    /// Wait for a value matching the given predicate. Resolves to `None` if the signal closes first.
    fn wait_for<F, R>(&self, predicate: F) -> impl std::future::Future<Output = Option<R::Output>> + Send
    where
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: WaitResult,
        T: Send + Sync;
}

/// Helper trait for `wait_for` to allow flexible predicate return types.
///
/// ## Semantics
/// - `result()` returns `Some(output)` to stop waiting and return `output`
/// - `result()` returns `None` to continue waiting for the next signal update
pub trait WaitResult {
    type Output;
    /// Returns Some(output) if we should stop waiting, None if we should continue
    fn result(self) -> Option<Self::Output>;
}

// true = stop with (), false = continue waiting
impl WaitResult for bool {
    type Output = ();
    fn result(self) -> Option<Self::Output> { if self { Some(()) } else { None } }
}

// Some(value) = stop with value, None = continue waiting
impl<T> WaitResult for Option<T> {
    type Output = T;
    fn result(self) -> Option<Self::Output> { self }
}

impl<T, S> Wait<T> for S
where
    S: Signal<T> + Sync,
    T: Clone + Send + Sync + 'static,
{
    fn wait_value(&self, target_value: T) -> impl std::future::Future<Output = bool> + Send
    where T: PartialEq + Clone + Send + Sync {
        let wait = self.wait_for(move |value: &T| *value == target_value);
        async move { wait.await.is_some() }
    }

    fn wait_for<F, R>(&self, predicate: F) -> impl std::future::Future<Output = Option<R::Output>> + Send
    where
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: WaitResult,
        T: Send + Sync,
    {
        // Bridge the synchronous broadcast into a channel. Listening replays the current value
        // of a latest-value signal, so it is checked before any later update.
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let guard = self.listen(Arc::new(move |notification| {
            let _ = tx.send(notification);
        }));

        async move {
            let _guard = guard;
            while let Some(Notification::Next(value)) = rx.recv().await {
                if let Some(result) = predicate(&value).result() {
                    return Some(result);
                }
            }
            None
        }
    }
}

impl<T> Read<Option<T>>
where T: Clone + Send + Sync + 'static
{
    /// The current value if it is non-null, otherwise the first non-null value submitted later.
    /// Resolves to `None` if the signal closes before that.
    pub async fn first_some(&self) -> Option<T> { self.wait_for(|value: &Option<T>| value.clone()).await }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mut;

    #[tokio::test]
    async fn wait_for_sees_current_value() {
        let signal = Mut::new(3);
        let found = signal.read().wait_for(|v: &i32| (*v > 2).then_some(*v)).await;
        assert_eq!(found, Some(3));
    }

    #[tokio::test]
    async fn first_some_waits_for_a_value() {
        let owner = Mut::new(None::<String>);
        let read = owner.read();
        let waiter = tokio::spawn(async move { read.first_some().await });

        tokio::task::yield_now().await;
        owner.set(None);
        owner.set(Some("u1".to_string()));
        owner.set(Some("u2".to_string()));

        assert_eq!(waiter.await.unwrap(), Some("u1".to_string()));
    }

    #[tokio::test]
    async fn wait_ends_when_signal_closes() {
        let signal = Mut::cold();
        let read = signal.read();
        let waiter = tokio::spawn(async move { read.wait_value(10u8).await });

        tokio::task::yield_now().await;
        signal.set(1);
        signal.close();
        assert!(!waiter.await.unwrap());
    }
}
