use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::{
    error::{ServiceError, StoreError},
    types::{Contact, ContactId, UserId},
};

/// The external authentication provider.
///
/// The session stream is the only source of truth for who is signed in: command results report
/// failures, not state.
#[async_trait]
pub trait AuthService: Send + Sync + 'static {
    fn current_session(&self) -> Option<UserId>;

    /// Every session change from now on
    fn session_changes(&self) -> BoxStream<'static, Option<UserId>>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), ServiceError>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<(), ServiceError>;
    async fn sign_out(&self) -> Result<(), ServiceError>;
    async fn delete_current_account(&self) -> Result<(), ServiceError>;
}

/// Per-owner contact storage
#[async_trait]
pub trait ContactStore: Send + Sync + 'static {
    /// Snapshots of the owner's contacts: the current set first, then one per change
    fn live_items(&self, owner: &UserId) -> BoxStream<'static, Vec<Contact>>;

    async fn add_item(&self, owner: &UserId, contact: Contact) -> Result<ContactId, StoreError>;
    async fn delete_item(&self, owner: &UserId, id: &ContactId) -> Result<(), StoreError>;
    async fn list_item_ids(&self, owner: &UserId) -> Result<Vec<ContactId>, StoreError>;
}

#[async_trait]
pub trait SearchService: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    async fn search(&self, term: &str) -> Result<Vec<Self::Item>, ServiceError>;
}
