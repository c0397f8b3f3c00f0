use parking_lot::Mutex;

use crate::{
    operator::derive,
    signal::{node::forward, Notification},
    Read,
};

impl<T> Read<T>
where T: Clone + Send + Sync + 'static
{
    /// Forward only the values matching `predicate`
    pub fn filter<F>(&self, predicate: F) -> Read<T>
    where F: Fn(&T) -> bool + Send + Sync + 'static {
        derive(self, self.is_latest(), move |output| {
            move |notification: Notification<T>| match notification {
                Notification::Next(value) if !predicate(&value) => {}
                notification => forward(&output, notification),
            }
        })
    }

    /// Suppress a value equal to the one emitted right before it. The first value always passes.
    pub fn distinct(&self) -> Read<T>
    where T: PartialEq {
        let last = Mutex::new(None::<T>);
        self.filter(move |value| {
            let mut last = last.lock();
            if last.as_ref() == Some(value) {
                return false;
            }
            *last = Some(value.clone());
            true
        })
    }
}

impl<T> Read<Option<T>>
where T: Clone + Send + Sync + 'static
{
    /// Drop `None` values, narrowing the element type
    pub fn drop_nulls(&self) -> Read<T> {
        derive(self, self.is_latest(), move |output| {
            move |notification: Notification<Option<T>>| match notification {
                Notification::Next(Some(value)) => forward(&output, Notification::Next(value)),
                Notification::Next(None) => {}
                Notification::Done => forward(&output, Notification::Done),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Mut, Subscribe};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Letter {
        A,
        B,
    }

    #[test]
    fn distinct_drops_consecutive_duplicates() {
        use Letter::*;
        let source = Mut::cold();
        let distinct = source.read().distinct();
        let (tx, rx) = std::sync::mpsc::channel();
        let _sub = distinct.subscribe(tx);

        for letter in [A, A, B, B, B, A] {
            source.set(letter);
        }
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![A, B, A]);
    }

    #[test]
    fn drop_nulls_narrows() {
        let source = Mut::cold();
        let values = source.read().drop_nulls();
        let (tx, rx) = std::sync::mpsc::channel();
        let _sub = values.subscribe(tx);

        source.set(None);
        source.set(Some(1));
        source.set(None);
        source.set(Some(2));
        assert_eq!(rx.try_iter().collect::<Vec<i32>>(), vec![1, 2]);
    }

    #[test]
    fn filter_keeps_matching() {
        let source = Mut::cold();
        let even = source.read().filter(|v: &u32| v % 2 == 0);
        let (tx, rx) = std::sync::mpsc::channel();
        let _sub = even.subscribe(tx);
        (1..=6).for_each(|v| source.set(v));
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![2, 4, 6]);
    }
}
