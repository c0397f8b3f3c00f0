use std::sync::Arc;

pub use crate::subscription::SubscriptionGuard;
use crate::signal::{Notification, Signal};

/// Type alias for subscribe listeners
pub type SubscribeListener<T> = Box<dyn Fn(T) + Send + Sync + 'static>;

/// Trait for types that can be converted into subscribe listeners
pub trait IntoSubscribeListener<T> {
    fn into_subscribe_listener(self) -> SubscribeListener<T>;
}

/// Trait for subscribing to values - provides the subscribe method
pub trait Subscribe<T: 'static> {
    /// Subscribe with a listener that receives every value. The terminal notification is not
    /// forwarded; use [`Signal::listen`] when completion matters.
    fn subscribe<F>(&self, listener: F) -> SubscriptionGuard
    where F: IntoSubscribeListener<T>;
}

impl<S, T> Subscribe<T> for S
where
    S: Signal<T>,
    T: 'static,
{
    fn subscribe<F>(&self, listener: F) -> SubscriptionGuard
    where F: IntoSubscribeListener<T> {
        let listener = listener.into_subscribe_listener();
        self.listen(Arc::new(move |notification| {
            if let Notification::Next(value) = notification {
                listener(value);
            }
        }))
    }
}

impl<T: Send + 'static> IntoSubscribeListener<T> for std::sync::mpsc::Sender<T> {
    fn into_subscribe_listener(self) -> SubscribeListener<T> {
        // std Sender is not Sync, so park it behind a mutex
        let sender = std::sync::Mutex::new(self);
        Box::new(move |value| {
            let _ = sender.lock().expect("sender lock is poisoned").send(value);
        })
    }
}

impl<T: Send + 'static> IntoSubscribeListener<T> for tokio::sync::mpsc::UnboundedSender<T> {
    fn into_subscribe_listener(self) -> SubscribeListener<T> {
        Box::new(move |value| {
            let _ = self.send(value);
        })
    }
}

impl<F, T> IntoSubscribeListener<T> for F
where F: Fn(T) + Send + Sync + 'static
{
    fn into_subscribe_listener(self) -> SubscribeListener<T> { Box::new(self) }
}
