//! Reactive state for a contact book: authentication, navigation and per-user contacts as signal
//! graphs, composed into one [`App`].

pub mod app;
pub mod auth;
pub mod collection;
pub mod config;
pub mod error;
pub mod memory;
pub mod navigation;
pub mod search;
pub mod traits;
pub mod types;

pub use app::App;
pub use auth::AuthGraph;
pub use collection::{CollectionGraph, WriteOp, WriteOutcome};
pub use config::Config;
pub use error::{AuthError, ConfigError, ServiceError, StoreError};
pub use navigation::NavigationGraph;
pub use search::{ContactSearch, Search, SearchState};
pub use types::{AuthStatus, Contact, ContactId, CurrentView, LoginCommand, RegisterCommand, UserId};

pub use contactbook_signals as signals;
