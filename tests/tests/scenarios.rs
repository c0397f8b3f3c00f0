mod common;

use common::{harness, settle, watcher};
use contactbook::{
    memory::{AuthCall, MemoryAuth, StoreCall},
    AuthError, AuthStatus, Contact, ContactId, CurrentView, Peek, StoreError, UserId, Wait, WriteOp, WriteOutcome,
};

#[tokio::test]
async fn failed_login_reports_a_single_error() -> anyhow::Result<()> {
    let h = harness(MemoryAuth::new());
    let (_loading, loading) = watcher(&h.app.loading());
    let (_errors, errors) = watcher(&h.app.auth_error());
    let (_status, status) = watcher(&h.app.auth_status());

    h.app.login("nobody@example.com", "secret1");
    settle().await;

    assert_eq!(loading(), [true, false]);
    assert_eq!(errors(), [AuthError::UserNotFound]);
    assert_eq!(status(), [AuthStatus::LoggedOut]); // the replayed initial status only
    assert_eq!(h.auth.calls(), [AuthCall::SignIn]);
    Ok(())
}

#[tokio::test]
async fn deleting_an_absent_contact_leaves_the_list_alone() -> anyhow::Result<()> {
    let u1 = UserId::from("u1");
    let h = harness(MemoryAuth::new().with_session("u1"));
    h.store.seed(&u1, [Contact::new("Ada", "Lovelace", "1"), Contact::new("Grace", "Hopper", "2")]);
    let items = h.app.items();
    assert!(items.wait_for(|items: &Vec<Contact>| items.len() == 2).await.is_some());
    let before = items.peek();
    let (_outcomes, outcomes) = watcher(&h.app.outcomes());

    h.app.delete_contact(ContactId::from("x"));
    settle().await;

    assert_eq!(items.peek(), before);
    assert_eq!(outcomes(), [WriteOutcome::Failed { op: WriteOp::Delete, error: StoreError::NotFound(ContactId::from("x")) }]);
    let deletes: Vec<_> = h.store.calls().into_iter().filter(|call| matches!(call, StoreCall::Delete(..))).collect();
    assert_eq!(deletes, [StoreCall::Delete(u1, ContactId::from("x"))]);
    Ok(())
}

#[tokio::test]
async fn creates_before_sign_in_run_once_for_the_first_user() -> anyhow::Result<()> {
    let h = harness(MemoryAuth::new().with_account("u1", "ada@example.com", "secret1"));
    let (_outcomes, outcomes) = watcher(&h.app.outcomes());
    let first = Contact::new("Ada", "Lovelace", "1");
    let second = Contact::new("Grace", "Hopper", "2");

    h.app.create_contact(first.clone());
    h.app.create_contact(second.clone());
    settle().await;
    assert!(h.store.calls().is_empty());

    h.app.login("ada@example.com", "secret1");
    assert!(h.app.auth_status().wait_value(AuthStatus::LoggedIn).await);
    settle().await;

    let u1 = UserId::from("u1");
    assert_eq!(h.store.calls(), [StoreCall::Add(u1.clone(), first.id.clone()), StoreCall::Add(u1.clone(), second.id.clone())]);
    assert_eq!(outcomes(), [WriteOutcome::Created(first.id.clone()), WriteOutcome::Created(second.id.clone())]);
    assert_eq!(h.store.contents(&u1), {
        let mut expected = vec![first, second];
        expected.sort_by(|a, b| a.id.cmp(&b.id));
        expected
    });
    Ok(())
}

#[tokio::test]
async fn navigation_after_sign_in_wins() -> anyhow::Result<()> {
    let h = harness(MemoryAuth::new().with_account("u1", "ada@example.com", "secret1"));
    let view = h.app.current_view();
    assert_eq!(view.peek(), Some(CurrentView::Login));

    h.app.login("ada@example.com", "secret1");
    assert!(view.wait_value(CurrentView::ContactList).await);
    h.app.go_to(CurrentView::CreateContact);

    assert_eq!(view.peek(), Some(CurrentView::CreateContact));
    Ok(())
}

#[tokio::test]
async fn restored_session_opens_the_contact_list() -> anyhow::Result<()> {
    let h = harness(MemoryAuth::new().with_session("u1"));
    assert_eq!(h.app.current_view().peek(), Some(CurrentView::ContactList));
    assert_eq!(h.app.contacts().owner().peek(), Some(Some(UserId::from("u1"))));
    Ok(())
}

#[tokio::test]
async fn sign_out_returns_to_login() -> anyhow::Result<()> {
    let h = harness(MemoryAuth::new().with_session("u1"));
    let (_views, views) = watcher(&h.app.current_view());

    h.app.logout();
    assert!(h.app.current_view().wait_value(CurrentView::Login).await);
    assert_eq!(views(), [CurrentView::ContactList, CurrentView::Login]);
    assert_eq!(h.app.contacts().owner().peek(), Some(None));
    Ok(())
}
