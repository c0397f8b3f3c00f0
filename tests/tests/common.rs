use std::sync::{Arc, Mutex};

use contactbook::{
    memory::{MemoryAuth, MemoryStore},
    App, Config, Read, Subscribe, SubscriptionGuard,
};
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    // if LOG_LEVEL env var is set, use it
    let level = std::env::var("LOG_LEVEL").ok().and_then(|level| level.parse().ok()).unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt().with_max_level(level).with_test_writer().try_init();
}

/// Record every value a signal emits; `check` drains what was recorded so far
#[allow(unused)]
pub fn watcher<T: Clone + Send + Sync + 'static>(signal: &Read<T>) -> (SubscriptionGuard, Box<dyn Fn() -> Vec<T> + Send + Sync>) {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let guard = {
        let changes = changes.clone();
        signal.subscribe(move |value: T| {
            changes.lock().unwrap().push(value);
        })
    };

    let check = Box::new(move || {
        let changes: Vec<T> = changes.lock().unwrap().drain(..).collect();
        changes
    });

    (guard, check)
}

#[allow(unused)]
pub struct Harness {
    pub auth: Arc<MemoryAuth>,
    pub store: Arc<MemoryStore>,
    pub app: App,
}

#[allow(unused)]
pub fn harness(auth: MemoryAuth) -> Harness {
    let auth = Arc::new(auth);
    let store = Arc::new(MemoryStore::new());
    let app = App::new(auth.clone(), store.clone(), Config::default());
    Harness { auth, store, app }
}

/// Let spawned pipeline tasks run until they are idle
#[allow(unused)]
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
