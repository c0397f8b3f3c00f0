mod common;

use std::time::Duration;

use common::{harness, settle, watcher};
use contactbook::{
    memory::{MemoryAuth, StoreCall},
    AuthStatus, Contact, Peek, SearchState, StoreError, UserId, Wait, WriteOutcome,
};

#[tokio::test]
async fn dispose_closes_every_exposed_signal() -> anyhow::Result<()> {
    let h = harness(MemoryAuth::new().with_session("u1"));
    let signals = (h.app.current_view(), h.app.loading(), h.app.auth_status(), h.app.items(), h.app.auth_error(), h.app.outcomes());

    h.app.dispose();
    h.app.dispose();

    assert!(signals.0.is_closed());
    assert!(signals.1.is_closed());
    assert!(signals.2.is_closed());
    assert!(signals.3.is_closed());
    assert!(signals.4.is_closed());
    assert!(signals.5.is_closed());
    Ok(())
}

#[tokio::test]
async fn identity_change_after_the_collection_closed_is_dropped() -> anyhow::Result<()> {
    let h = harness(MemoryAuth::new().with_account("u1", "ada@example.com", "secret1"));
    h.app.contacts().dispose();

    h.app.login("ada@example.com", "secret1");
    let status = h.app.auth_status();
    assert!(status.wait_value(AuthStatus::LoggedIn).await);

    let owner = h.app.contacts().owner();
    assert!(owner.is_closed());
    assert_eq!(owner.peek(), Some(None));
    Ok(())
}

#[tokio::test]
async fn bulk_delete_reports_partial_failure() -> anyhow::Result<()> {
    let u1 = UserId::from("u1");
    let h = harness(MemoryAuth::new().with_session("u1"));
    let contacts = [Contact::new("Ada", "Lovelace", "1"), Contact::new("Grace", "Hopper", "2")];
    h.store.seed(&u1, contacts.clone());
    h.store.fail_delete(contacts[0].id.clone(), StoreError::Rejected("locked".into()));
    let (_outcomes, outcomes) = watcher(&h.app.outcomes());

    h.app.delete_all_contacts();
    settle().await;

    assert_eq!(
        outcomes(),
        [WriteOutcome::BulkDeleted { deleted: 1, failed: vec![(contacts[0].id.clone(), StoreError::Rejected("locked".into()))] }]
    );
    let deletes = h.store.calls().into_iter().filter(|call| matches!(call, StoreCall::Delete(..))).count();
    assert_eq!(deletes, 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn contact_search_filters_the_live_list() -> anyhow::Result<()> {
    let u1 = UserId::from("u1");
    let h = harness(MemoryAuth::new().with_session("u1"));
    let grace = Contact::new("Grace", "Hopper", "2");
    h.store.seed(&u1, [Contact::new("Ada", "Lovelace", "1"), grace.clone()]);
    assert!(h.app.items().wait_for(|items: &Vec<Contact>| items.len() == 2).await.is_some());
    let (_results, results) = watcher(&h.app.search_results());

    h.app.search_contacts("gr");
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(results(), [Some(SearchState::Loading), Some(SearchState::Populated(vec![grace]))]);
    Ok(())
}
