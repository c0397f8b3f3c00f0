use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use contactbook_signals::Mut;
use futures::stream::BoxStream;
use tracing::debug;

use crate::{
    error::StoreError,
    traits::ContactStore,
    types::{Contact, ContactId, UserId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Add(UserId, ContactId),
    Delete(UserId, ContactId),
    List(UserId),
}

struct Shelf {
    items: BTreeMap<ContactId, Contact>,
    snapshot: Mut<Vec<Contact>>,
}

impl Shelf {
    fn new() -> Self { Self { items: BTreeMap::new(), snapshot: Mut::new(Vec::new()) } }

    fn publish(&self) { self.snapshot.set(self.items.values().cloned().collect()); }
}

/// Contacts per owner, ordered by id, with a live snapshot per owner.
///
/// Deletes can be made to fail per id with [`fail_delete`](Self::fail_delete); every call is logged.
#[derive(Default)]
pub struct MemoryStore {
    shelves: Mutex<HashMap<UserId, Shelf>>,
    failing_deletes: Mutex<HashMap<ContactId, StoreError>>,
    calls: Mutex<Vec<StoreCall>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    /// Put contacts in place without logging a call
    pub fn seed(&self, owner: &UserId, contacts: impl IntoIterator<Item = Contact>) {
        let mut shelves = self.shelves.lock().expect("shelves lock is poisoned");
        let shelf = shelves.entry(owner.clone()).or_insert_with(Shelf::new);
        for contact in contacts {
            shelf.items.insert(contact.id.clone(), contact);
        }
        shelf.publish();
    }

    /// Make every delete of `id` fail with `error`
    pub fn fail_delete(&self, id: ContactId, error: StoreError) {
        self.failing_deletes.lock().expect("failing deletes lock is poisoned").insert(id, error);
    }

    pub fn calls(&self) -> Vec<StoreCall> { self.calls.lock().expect("calls lock is poisoned").clone() }

    /// The owner's contacts right now
    pub fn contents(&self, owner: &UserId) -> Vec<Contact> {
        let shelves = self.shelves.lock().expect("shelves lock is poisoned");
        shelves.get(owner).map(|shelf| shelf.items.values().cloned().collect()).unwrap_or_default()
    }

    fn record(&self, call: StoreCall) {
        debug!("store call {call:?}");
        self.calls.lock().expect("calls lock is poisoned").push(call);
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    fn live_items(&self, owner: &UserId) -> BoxStream<'static, Vec<Contact>> {
        let mut shelves = self.shelves.lock().expect("shelves lock is poisoned");
        shelves.entry(owner.clone()).or_insert_with(Shelf::new).snapshot.read().into_stream()
    }

    async fn add_item(&self, owner: &UserId, contact: Contact) -> Result<ContactId, StoreError> {
        self.record(StoreCall::Add(owner.clone(), contact.id.clone()));
        let mut shelves = self.shelves.lock().expect("shelves lock is poisoned");
        let shelf = shelves.entry(owner.clone()).or_insert_with(Shelf::new);
        if shelf.items.contains_key(&contact.id) {
            return Err(StoreError::Rejected(format!("{} already exists", contact.id)));
        }
        let id = contact.id.clone();
        shelf.items.insert(id.clone(), contact);
        shelf.publish();
        Ok(id)
    }

    async fn delete_item(&self, owner: &UserId, id: &ContactId) -> Result<(), StoreError> {
        self.record(StoreCall::Delete(owner.clone(), id.clone()));
        if let Some(error) = self.failing_deletes.lock().expect("failing deletes lock is poisoned").get(id) {
            return Err(error.clone());
        }
        let mut shelves = self.shelves.lock().expect("shelves lock is poisoned");
        let shelf = shelves.get_mut(owner).ok_or_else(|| StoreError::NotFound(id.clone()))?;
        shelf.items.remove(id).ok_or_else(|| StoreError::NotFound(id.clone()))?;
        shelf.publish();
        Ok(())
    }

    async fn list_item_ids(&self, owner: &UserId) -> Result<Vec<ContactId>, StoreError> {
        self.record(StoreCall::List(owner.clone()));
        Ok(self.shelves.lock().expect("shelves lock is poisoned").get(owner).map(|shelf| shelf.items.keys().cloned().collect()).unwrap_or_default())
    }
}
