use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use contactbook_signals::{merge, Mut, Read, TaskGuard};
use tracing::{debug, info, warn};

use crate::{
    error::{AuthError, ServiceError},
    traits::AuthService,
    types::{AuthStatus, LoginCommand, RegisterCommand, UserId},
};

/// Authentication state: command ports in, session-derived status and mapped errors out.
///
/// `status` follows the collaborator's session stream only; a successful sign-in is observed
/// when the session changes, not when the call returns. Must be built within a tokio runtime.
pub struct AuthGraph {
    login: Mut<LoginCommand>,
    register: Mut<RegisterCommand>,
    logout: Mut<()>,
    delete_account: Mut<()>,
    user_id: Mut<Option<UserId>>,
    // one in-flight sink per command; the brackets only hold them weakly
    busy: [Mut<bool>; 4],
    session_feed: TaskGuard,
    status: Read<AuthStatus>,
    error: Read<AuthError>,
    loading: Read<bool>,
    disposed: AtomicBool,
}

impl AuthGraph {
    pub fn new(service: Arc<dyn AuthService>) -> Self {
        let user_id = Mut::new(service.current_session());
        let session_feed = user_id.feed(service.session_changes());
        let status = user_id.read().map(|session| AuthStatus::from_session(&session)).distinct();

        let busy: [Mut<bool>; 4] = std::array::from_fn(|_| Mut::empty());
        let login = Mut::cold();
        let register = Mut::cold();
        let logout = Mut::cold();
        let delete_account = Mut::cold();

        let login_errors = {
            let service = service.clone();
            login.read().bracket(&busy[0], move |command: LoginCommand| {
                let service = service.clone();
                async move { failure("sign in", service.sign_in(&command.email, &command.password).await) }
            })
        };
        let register_errors = {
            let service = service.clone();
            register.read().bracket(&busy[1], move |command: RegisterCommand| {
                let service = service.clone();
                async move { failure("sign up", service.sign_up(&command.email, &command.password).await) }
            })
        };
        let logout_errors = {
            let service = service.clone();
            logout.read().bracket(&busy[2], move |()| {
                let service = service.clone();
                async move { failure("sign out", service.sign_out().await) }
            })
        };
        let delete_errors = {
            let service = service.clone();
            delete_account.read().bracket(&busy[3], move |()| {
                let service = service.clone();
                async move { failure("delete account", service.delete_current_account().await) }
            })
        };

        let error = merge([login_errors.drop_nulls(), register_errors.drop_nulls(), logout_errors.drop_nulls(), delete_errors.drop_nulls()]);
        let loading = merge(busy.iter().map(Mut::read))
            .scan(0usize, |in_flight: &mut usize, started: bool| {
                if started {
                    *in_flight += 1;
                } else {
                    *in_flight = in_flight.saturating_sub(1);
                }
                *in_flight > 0
            })
            .distinct();

        debug!("auth graph built");
        Self { login, register, logout, delete_account, user_id, busy, session_feed, status, error, loading, disposed: AtomicBool::new(false) }
    }

    pub fn login(&self, email: impl Into<String>, password: impl Into<String>) {
        self.login.set(LoginCommand { email: email.into(), password: password.into() });
    }

    pub fn register(&self, email: impl Into<String>, password: impl Into<String>) {
        self.register.set(RegisterCommand { email: email.into(), password: password.into() });
    }

    pub fn logout(&self) { self.logout.set(()); }

    pub fn delete_account(&self) { self.delete_account.set(()); }

    pub fn status(&self) -> Read<AuthStatus> { self.status.clone() }

    /// Every command failure, mapped to an [`AuthError`]
    pub fn error(&self) -> Read<AuthError> { self.error.clone() }

    /// `true` while any command is in flight. Replays the current state to new observers once a
    /// command has run.
    pub fn loading(&self) -> Read<bool> { self.loading.clone() }

    /// The signed-in user, seeded from the collaborator's session at construction
    pub fn user_id(&self) -> Read<Option<UserId>> { self.user_id.read() }

    /// Stop following the session and close every port. Commands still in flight are abandoned.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.session_feed.abort();
        self.login.close();
        self.register.close();
        self.logout.close();
        self.delete_account.close();
        self.user_id.close();
        for busy in &self.busy {
            busy.close();
        }
        info!("auth graph disposed");
    }
}

impl Drop for AuthGraph {
    fn drop(&mut self) { self.dispose(); }
}

fn failure(operation: &'static str, result: Result<(), ServiceError>) -> Option<AuthError> {
    match result {
        Ok(()) => None,
        Err(err) => {
            let mapped = AuthError::from(&err);
            warn!("{operation} failed with {err}; reporting {mapped:?}");
            Some(mapped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{AuthCall, MemoryAuth};
    use contactbook_signals::{Peek, Subscribe, Wait};
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    fn drain<T>(rx: &mut UnboundedReceiver<T>) -> Vec<T> {
        let mut values = Vec::new();
        while let Ok(value) = rx.try_recv() {
            values.push(value);
        }
        values
    }

    #[tokio::test]
    async fn failed_login_reports_one_error_and_brackets_loading() {
        let service = Arc::new(MemoryAuth::new());
        let graph = AuthGraph::new(service.clone());
        let (loading_tx, mut loading_rx) = unbounded_channel();
        let _loading = graph.loading().subscribe(loading_tx);
        let (status_tx, mut status_rx) = unbounded_channel();
        let _status = graph.status().subscribe(status_tx);
        let (error_tx, mut error_rx) = unbounded_channel();
        let _error = graph.error().subscribe(error_tx);

        graph.login("nobody@example.com", "secret1");
        assert_eq!(error_rx.recv().await, Some(AuthError::UserNotFound));

        assert_eq!(drain(&mut loading_rx), vec![true, false]);
        assert!(drain(&mut error_rx).is_empty());
        // only the replayed initial status
        assert_eq!(drain(&mut status_rx), vec![AuthStatus::LoggedOut]);
        assert_eq!(service.calls(), vec![AuthCall::SignIn]);
    }

    #[tokio::test]
    async fn status_follows_the_session_stream() {
        let service = Arc::new(MemoryAuth::new().with_account("u1", "ada@example.com", "secret1"));
        let graph = AuthGraph::new(service.clone());
        assert_eq!(graph.status().peek(), Some(AuthStatus::LoggedOut));

        graph.login("ada@example.com", "secret1");
        assert!(graph.status().wait_value(AuthStatus::LoggedIn).await);
        assert_eq!(graph.user_id().peek(), Some(Some(UserId::from("u1"))));

        graph.logout();
        assert!(graph.status().wait_value(AuthStatus::LoggedOut).await);
    }

    #[tokio::test]
    async fn restored_session_seeds_user_id() {
        let service = Arc::new(MemoryAuth::new().with_session("u9"));
        let graph = AuthGraph::new(service);
        assert_eq!(graph.user_id().peek(), Some(Some(UserId::from("u9"))));
        assert_eq!(graph.status().peek(), Some(AuthStatus::LoggedIn));
    }

    #[tokio::test]
    async fn overlapping_commands_load_once() {
        let service = Arc::new(MemoryAuth::new());
        service.fail_next(AuthCall::SignUp, "WEAK-PASSWORD");
        let graph = AuthGraph::new(service.clone());
        let (loading_tx, mut loading_rx) = unbounded_channel();
        let _loading = graph.loading().subscribe(loading_tx);
        let (error_tx, mut error_rx) = unbounded_channel();
        let _error = graph.error().subscribe(error_tx);

        graph.register("ada@example.com", "secret1");
        graph.delete_account();
        let mut errors = vec![error_rx.recv().await.unwrap(), error_rx.recv().await.unwrap()];
        errors.sort_by_key(|error| error.to_string());

        assert_eq!(errors, vec![AuthError::NoCurrentUser, AuthError::WeakPassword]);
        assert_eq!(drain(&mut loading_rx), vec![true, false]);
        assert_eq!(graph.loading().peek(), Some(false));
    }

    #[tokio::test]
    async fn dispose_closes_every_signal() {
        let graph = AuthGraph::new(Arc::new(MemoryAuth::new()));
        let (status, error, loading) = (graph.status(), graph.error(), graph.loading());
        graph.dispose();
        graph.dispose();
        assert!(status.is_closed());
        assert!(graph.user_id().is_closed());
        assert!(error.is_closed());
        assert!(loading.is_closed());
    }

    #[tokio::test]
    async fn dispose_abandons_commands_in_flight() {
        let service = Arc::new(MemoryAuth::new().with_account("u1", "ada@example.com", "secret1"));
        let graph = AuthGraph::new(service.clone());
        let (error, loading) = (graph.error(), graph.loading());
        let (loading_tx, mut loading_rx) = unbounded_channel();
        let _loading = loading.subscribe(loading_tx);

        // the worker has not been polled yet, so the sign-in is still pending
        graph.login("ada@example.com", "secret1");
        graph.dispose();

        assert!(error.is_closed());
        assert!(loading.is_closed());
        assert_eq!(drain(&mut loading_rx), vec![true, false]);
        tokio::task::yield_now().await;
        assert!(service.calls().is_empty());
    }
}
