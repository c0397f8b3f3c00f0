//! In-process collaborators backed by plain maps, for the demo and for tests.

mod auth;
mod store;

pub use auth::{AuthCall, MemoryAuth};
pub use store::{MemoryStore, StoreCall};
