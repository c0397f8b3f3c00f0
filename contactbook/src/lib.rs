//! # Contactbook
//!
//! Reactive application state for a contact book, built from push-based signals.
//!
//! ## Key Features
//!
//! - **Typed ports**: every signal is split into a write port ([`Mut`]) and a read port ([`Read`])
//! - **Eager operators**: `map`, `distinct`, `debounce`, `switch_latest`, `merge`, `take`, `then` and `bracket`
//! - **Prompt cancellation**: dropping or disposing a subscription tears down its whole upstream chain
//! - **Domain graphs**: authentication, navigation and per-user contacts, composed by [`App`]
//!
//! ## Core Concepts
//!
//! - **Signal**: a sequence of values over time, either cold or latest-value
//! - **Graph**: a set of write ports and the derived read signals that answer them
//! - **Collaborator**: an external auth provider or contact store, behind [`AuthService`] and [`ContactStore`]
//!
//! ## Quick Start
//!
//! ```bash
//! cargo run -p contactbook --bin demo
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use contactbook::{memory::MemoryAuth, memory::MemoryStore, App, Config, Subscribe};
//!
//! #[tokio::main]
//! async fn main() {
//!     let auth = Arc::new(MemoryAuth::new().with_account("u1", "ada@example.com", "secret1"));
//!     let app = App::new(auth, Arc::new(MemoryStore::new()), Config::default());
//!     let _view = app.current_view().subscribe(|view: contactbook::CurrentView| println!("showing {view:?}"));
//!     app.login("ada@example.com", "secret1");
//! }
//! ```

pub use contactbook_core::*;
pub use contactbook_signals::{
    merge, Mut, Notification, Peek, Read, SignalError, Subscribe, SubscriptionGuard, TaskGuard, Wait, WeakMut,
};
