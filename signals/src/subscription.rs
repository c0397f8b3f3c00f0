use std::any::Any;

/// A disposable handle for an active listen.
///
/// The guard owns whatever keeps the subscription alive: the listener registration, the
/// source signal it listens to, and for operators any inner subscriptions. Dropping the
/// guard or calling [`dispose`](Self::dispose) releases all of it before returning.
#[must_use = "dropping a SubscriptionGuard ends the subscription"]
pub struct SubscriptionGuard {
    resources: Option<Box<dyn Any + Send + Sync>>,
}

impl SubscriptionGuard {
    pub fn new<R>(resources: R) -> Self
    where R: Any + Send + Sync {
        Self { resources: Some(Box::new(resources)) }
    }

    /// A guard that owns nothing
    pub fn empty() -> Self { Self { resources: None } }

    /// Release the subscription. Returns false if it was already disposed.
    pub fn dispose(&mut self) -> bool { self.resources.take().is_some() }

    pub fn is_disposed(&self) -> bool { self.resources.is_none() }
}

impl std::fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionGuard").field("disposed", &self.is_disposed()).finish()
    }
}
