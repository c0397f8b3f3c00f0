pub mod mutable;
pub(crate) mod node;
pub mod read;
pub mod source;

pub use mutable::*;
pub use read::*;

use std::sync::Arc;

use crate::subscription::SubscriptionGuard;

/// One event on a signal: a value, or the terminal notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<T> {
    Next(T),
    Done,
}

impl<T> Notification<T> {
    pub fn into_value(self) -> Option<T> {
        match self {
            Notification::Next(value) => Some(value),
            Notification::Done => None,
        }
    }
}

/// Low-level listener over a signal's notifications
pub type Listener<T> = Arc<dyn Fn(Notification<T>) + Send + Sync + 'static>;

/// Core trait for signals: the only way to observe one.
pub trait Signal<T> {
    /// Register a listener. A latest-value signal replays its current value into the
    /// listener before this returns; a closed signal also replays `Done`.
    fn listen(&self, listener: Listener<T>) -> SubscriptionGuard;
}

/// Trait for getting the current value of a signal without subscribing
pub trait Peek<T> {
    /// The remembered value. Always `None` for cold signals.
    fn peek(&self) -> Option<T>;
}
