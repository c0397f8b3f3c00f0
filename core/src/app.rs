use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use contactbook_signals::{merge, Read, Subscribe, SubscriptionGuard};
use tracing::{info, trace};

use crate::{
    auth::AuthGraph,
    collection::{CollectionGraph, WriteOutcome},
    config::Config,
    error::AuthError,
    navigation::NavigationGraph,
    search::{ContactSearch, Search, SearchState},
    traits::{AuthService, ContactStore},
    types::{AuthStatus, Contact, ContactId, CurrentView, UserId},
};

/// The application signal set: the auth, navigation and collection graphs wired together.
///
/// The signed-in user is forwarded into the collection's owner port, and the visible screen is
/// whichever of navigation or auth status changed last. Must be built within a tokio runtime.
pub struct App {
    auth: AuthGraph,
    navigation: NavigationGraph,
    contacts: CollectionGraph,
    search: Search<Contact>,
    current_view: Read<CurrentView>,
    forwarding: Mutex<SubscriptionGuard>,
    disposed: AtomicBool,
}

impl App {
    pub fn new(auth: Arc<dyn AuthService>, store: Arc<dyn ContactStore>, config: Config) -> Self {
        let auth = AuthGraph::new(auth);
        let navigation = NavigationGraph::new();
        let contacts = CollectionGraph::new(store);
        let search = Search::new(Arc::new(ContactSearch::new(contacts.items())), &config);

        let forwarding = {
            let owner = contacts.owner_port();
            auth.user_id().subscribe(move |user_id: Option<UserId>| {
                if owner.try_set(user_id).is_err() {
                    trace!("owner port already closed; identity change not forwarded");
                }
            })
        };

        // navigation first, so a restored session lands on the contact list
        let current_view = merge([
            navigation.current_view(),
            auth.status().map(|status| match status {
                AuthStatus::LoggedIn => CurrentView::ContactList,
                AuthStatus::LoggedOut => CurrentView::Login,
            }),
        ]);

        info!("app started with {config:?}");
        Self { auth, navigation, contacts, search, current_view, forwarding: Mutex::new(forwarding), disposed: AtomicBool::new(false) }
    }

    pub fn login(&self, email: impl Into<String>, password: impl Into<String>) { self.auth.login(email, password); }

    pub fn register(&self, email: impl Into<String>, password: impl Into<String>) { self.auth.register(email, password); }

    pub fn logout(&self) { self.auth.logout(); }

    pub fn delete_account(&self) { self.auth.delete_account(); }

    pub fn create_contact(&self, contact: Contact) { self.contacts.create(contact); }

    pub fn delete_contact(&self, id: ContactId) { self.contacts.delete(id); }

    pub fn delete_all_contacts(&self) { self.contacts.delete_all(); }

    pub fn go_to(&self, view: CurrentView) { self.navigation.go_to(view); }

    pub fn search_contacts(&self, text: impl Into<String>) { self.search.set_query(text); }

    pub fn current_view(&self) -> Read<CurrentView> { self.current_view.clone() }

    pub fn loading(&self) -> Read<bool> { self.auth.loading() }

    pub fn auth_error(&self) -> Read<AuthError> { self.auth.error() }

    pub fn auth_status(&self) -> Read<AuthStatus> { self.auth.status() }

    pub fn items(&self) -> Read<Vec<Contact>> { self.contacts.items() }

    pub fn outcomes(&self) -> Read<WriteOutcome> { self.contacts.outcomes() }

    pub fn search_results(&self) -> Read<Option<SearchState<Contact>>> { self.search.results() }

    pub fn auth(&self) -> &AuthGraph { &self.auth }

    pub fn navigation(&self) -> &NavigationGraph { &self.navigation }

    pub fn contacts(&self) -> &CollectionGraph { &self.contacts }

    /// Dispose every graph, then the identity forwarding. Idempotent.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.auth.dispose();
        self.navigation.dispose();
        self.contacts.dispose();
        self.search.dispose();
        self.forwarding.lock().expect("forwarding lock is poisoned").dispose();
        info!("app disposed");
    }
}

impl Drop for App {
    fn drop(&mut self) { self.dispose(); }
}
