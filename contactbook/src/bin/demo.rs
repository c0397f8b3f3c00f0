use std::{sync::Arc, time::Duration};

use anyhow::Context;
use contactbook::{
    memory::{MemoryAuth, MemoryStore},
    App, AuthError, Config, Contact, CurrentView, SearchState, Subscribe, Wait, WriteOutcome,
};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = Config::from_env().context("reading configuration")?.with_search_latency(Duration::from_millis(200));
    let auth = Arc::new(MemoryAuth::new().with_account("demo-user", "ada@example.com", "secret1"));
    let store = Arc::new(MemoryStore::new());
    let app = App::new(auth, store, config);

    let _view = app.current_view().subscribe(|view: CurrentView| info!("view: {view:?}"));
    let _loading = app.loading().subscribe(|loading: bool| info!("loading: {loading}"));
    let _errors = app.auth_error().subscribe(|error: AuthError| info!("auth error: {error}: {}", error.message()));
    let _items = app.items().subscribe(|items: Vec<Contact>| info!("{} contacts", items.len()));
    let _search = app.search_results().subscribe(|state: Option<SearchState<Contact>>| info!("search: {state:?}"));

    app.login("ada@example.com", "wrong");
    app.login("ada@example.com", "secret1");
    app.current_view().wait_value(CurrentView::ContactList).await;

    for (first, last) in [("Ada", "Lovelace"), ("Grace", "Hopper"), ("Alan", "Turing")] {
        app.create_contact(Contact::new(first, last, "555-0100"));
    }
    app.items().wait_for(|items: &Vec<Contact>| items.len() == 3).await.context("contacts never arrived")?;

    app.search_contacts("gr");
    tokio::time::sleep(Duration::from_secs(1)).await;

    // the listener is registered before the command goes out
    let outcomes = app.outcomes();
    let cleared = outcomes.wait_for(|outcome: &WriteOutcome| matches!(outcome, WriteOutcome::BulkDeleted { .. }));
    app.delete_all_contacts();
    cleared.await.context("collection closed before the bulk delete finished")?;
    app.logout();
    app.current_view().wait_value(CurrentView::Login).await;

    app.dispose();
    Ok(())
}
