use std::sync::{Arc, Weak};

use tracing::warn;

use crate::{error::SignalError, signal::node::Node, Read};

/// Write port of a signal. We intentionally do not implement `Signal` or `Subscribe` for this type:
/// observing goes through [`Mut::read`], and nothing reachable from a [`Read`] can submit or close.
///
/// Dropping the write port closes the signal.
pub struct Mut<T>(pub(crate) Arc<Node<T>>)
where T: Clone + Send + Sync + 'static;

impl<T> Mut<T>
where T: Clone + Send + Sync + 'static
{
    /// Latest-value signal seeded with `value`
    pub fn new(value: T) -> Self { Self(Arc::new(Node::latest(Some(value)))) }

    /// Latest-value signal with nothing remembered until the first `set`
    pub fn empty() -> Self { Self(Arc::new(Node::latest(None))) }

    /// Signal without memory: observers only see values submitted after they attach
    pub fn cold() -> Self { Self(Arc::new(Node::cold())) }

    /// Submit a value to every current observer, synchronously and in registration order.
    ///
    /// Submitting to a closed signal is a programming error: it panics in debug builds and is
    /// logged and dropped otherwise. Use [`try_set`](Self::try_set) to handle it.
    pub fn set(&self, value: T) { reject_closed(self.try_set(value)) }

    pub fn try_set(&self, value: T) -> Result<(), SignalError> { self.0.emit(value) }

    /// Deliver the terminal notification and release everything feeding this signal. Idempotent.
    pub fn close(&self) { self.0.close(); }

    pub fn is_closed(&self) -> bool { self.0.is_closed() }

    /// Readonly signal downstream of this write port
    pub fn read(&self) -> Read<T> { Read(self.0.clone()) }

    /// A non-owning write handle for listener closures and background tasks
    pub fn downgrade(&self) -> WeakMut<T> { WeakMut(Arc::downgrade(&self.0)) }
}

impl<T> Drop for Mut<T>
where T: Clone + Send + Sync + 'static
{
    fn drop(&mut self) { self.0.close(); }
}

/// Weak write handle; it never keeps the signal alive.
pub struct WeakMut<T>(Weak<Node<T>>);

impl<T> Clone for WeakMut<T> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> WeakMut<T>
where T: Clone + Send + Sync + 'static
{
    /// Same contract as [`Mut::set`]; a signal that no longer exists counts as closed.
    pub fn set(&self, value: T) { reject_closed(self.try_set(value)) }

    pub fn try_set(&self, value: T) -> Result<(), SignalError> {
        match self.0.upgrade() {
            Some(node) => node.emit(value),
            None => Err(SignalError::Closed),
        }
    }

    pub fn close(&self) {
        if let Some(node) = self.0.upgrade() {
            node.close();
        }
    }
}

/// Split a signal into its producer-only and consumer-only halves.
pub fn split<T>(signal: Mut<T>) -> (Mut<T>, Read<T>)
where T: Clone + Send + Sync + 'static {
    let read = signal.read();
    (signal, read)
}

fn reject_closed(result: Result<(), SignalError>) {
    if let Err(err) = result {
        if cfg!(debug_assertions) {
            panic!("submit to a closed write port: {err}");
        }
        warn!("submit to a closed write port ignored: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Subscribe;
    use std::sync::Mutex;

    #[test]
    fn latest_value_replays_to_new_observers() {
        let signal = Mut::new(1);
        signal.set(2);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let _sub = {
            let seen = seen.clone();
            signal.read().subscribe(move |v: i32| seen.lock().unwrap().push(v))
        };
        signal.set(3);
        assert_eq!(*seen.lock().unwrap(), vec![2, 3]);
    }

    #[test]
    fn cold_signal_has_no_memory() {
        let signal = Mut::cold();
        signal.set("early");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let _sub = {
            let seen = seen.clone();
            signal.read().subscribe(move |v: &'static str| seen.lock().unwrap().push(v))
        };
        signal.set("late");
        assert_eq!(*seen.lock().unwrap(), vec!["late"]);
    }

    #[test]
    fn close_is_idempotent_and_rejects_submits() {
        let signal = Mut::new(0u8);
        signal.close();
        signal.close();
        assert!(signal.is_closed());
        assert_eq!(signal.try_set(1), Err(SignalError::Closed));
    }

    #[test]
    #[should_panic(expected = "closed write port")]
    #[cfg(debug_assertions)]
    fn set_after_close_fails_loudly() {
        let signal = Mut::cold();
        signal.close();
        signal.set(1u8);
    }

    #[test]
    fn weak_handle_does_not_keep_signal_alive() {
        let signal = Mut::new(5u32);
        let weak = signal.downgrade();
        assert!(weak.try_set(6).is_ok());
        drop(signal);
        assert_eq!(weak.try_set(7), Err(SignalError::Closed));
    }
}
