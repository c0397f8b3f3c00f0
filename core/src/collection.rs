//! The contact collection of the signed-in user.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use contactbook_signals::{merge, task::Spawner, Mut, Read, WeakMut};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::{
    error::StoreError,
    traits::ContactStore,
    types::{Contact, ContactId, UserId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOp {
    Create,
    Delete,
    DeleteAll,
}

/// What became of one create, delete or delete-all command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Created(ContactId),
    Deleted(ContactId),
    /// Ids that were already gone count as deleted
    BulkDeleted { deleted: usize, failed: Vec<(ContactId, StoreError)> },
    Failed { op: WriteOp, error: StoreError },
    /// The graph was disposed before an owner was known
    Abandoned(WriteOp),
}

/// Contacts of the current owner, and the commands that change them.
///
/// Commands wait for an owner: one submitted while nobody is signed in runs against the first
/// owner that appears. Must be built within a tokio runtime; the commands may then be issued
/// from any thread.
pub struct CollectionGraph {
    owner: Mut<Option<UserId>>,
    create: Mut<Contact>,
    delete: Mut<ContactId>,
    delete_all: Mut<()>,
    items: Read<Vec<Contact>>,
    outcomes: Read<WriteOutcome>,
    disposed: AtomicBool,
}

impl CollectionGraph {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        let owner: Mut<Option<UserId>> = Mut::new(None);
        let create = Mut::cold();
        let delete = Mut::cold();
        let delete_all = Mut::cold();

        let spawner = Spawner::current();
        let items = {
            let store = store.clone();
            owner.read().distinct().switch_latest(move |owner: Option<UserId>| match owner {
                Some(owner) => {
                    debug!("following contacts of {owner}");
                    Read::from_stream_on(&spawner, store.live_items(&owner))
                }
                None => Read::pending(),
            })
        };

        let created = {
            let (owner, store) = (owner.read(), store.clone());
            create.read().then(move |contact: Contact| {
                let (owner, store) = (owner.clone(), store.clone());
                async move {
                    let Some(owner) = owner.first_some().await else { return WriteOutcome::Abandoned(WriteOp::Create) };
                    match store.add_item(&owner, contact).await {
                        Ok(id) => WriteOutcome::Created(id),
                        Err(error) => failed(WriteOp::Create, error),
                    }
                }
            })
        };
        let deleted = {
            let (owner, store) = (owner.read(), store.clone());
            delete.read().then(move |id: ContactId| {
                let (owner, store) = (owner.clone(), store.clone());
                async move {
                    let Some(owner) = owner.first_some().await else { return WriteOutcome::Abandoned(WriteOp::Delete) };
                    match store.delete_item(&owner, &id).await {
                        Ok(()) => WriteOutcome::Deleted(id),
                        Err(error) => failed(WriteOp::Delete, error),
                    }
                }
            })
        };
        let cleared = {
            let (owner, store) = (owner.read(), store.clone());
            delete_all.read().then(move |()| {
                let (owner, store) = (owner.clone(), store.clone());
                async move {
                    let Some(owner) = owner.first_some().await else { return WriteOutcome::Abandoned(WriteOp::DeleteAll) };
                    delete_everything(store.as_ref(), &owner).await
                }
            })
        };

        Self { owner, create, delete, delete_all, items, outcomes: merge([created, deleted, cleared]), disposed: AtomicBool::new(false) }
    }

    pub fn set_owner(&self, owner: Option<UserId>) { self.owner.set(owner); }

    /// A non-owning handle to the owner port, for forwarding another graph's identity into it
    pub fn owner_port(&self) -> WeakMut<Option<UserId>> { self.owner.downgrade() }

    pub fn owner(&self) -> Read<Option<UserId>> { self.owner.read() }

    pub fn create(&self, contact: Contact) { self.create.set(contact); }

    pub fn delete(&self, id: ContactId) { self.delete.set(id); }

    pub fn delete_all(&self) { self.delete_all.set(()); }

    /// The owner's contacts. Keeps the last list while no owner is set.
    pub fn items(&self) -> Read<Vec<Contact>> { self.items.clone() }

    pub fn outcomes(&self) -> Read<WriteOutcome> { self.outcomes.clone() }

    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.create.close();
        self.delete.close();
        self.delete_all.close();
        self.owner.close();
        info!("collection graph disposed");
    }
}

impl Drop for CollectionGraph {
    fn drop(&mut self) { self.dispose(); }
}

/// List the owner's ids and delete them all concurrently; one failure does not stop the rest
async fn delete_everything(store: &dyn ContactStore, owner: &UserId) -> WriteOutcome {
    let ids = match store.list_item_ids(owner).await {
        Ok(ids) => ids,
        Err(error) => return failed(WriteOp::DeleteAll, error),
    };
    let results = join_all(ids.iter().map(|id| store.delete_item(owner, id))).await;

    let mut deleted = 0;
    let mut failures = Vec::new();
    for (id, result) in ids.into_iter().zip(results) {
        match result {
            Ok(()) | Err(StoreError::NotFound(_)) => deleted += 1,
            Err(error) => {
                warn!("failed to delete {id}: {error}");
                failures.push((id, error));
            }
        }
    }
    WriteOutcome::BulkDeleted { deleted, failed: failures }
}

fn failed(op: WriteOp, error: StoreError) -> WriteOutcome {
    warn!("{op:?} failed: {error}");
    WriteOutcome::Failed { op, error }
}
