use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use contactbook_signals::{Mut, Peek};
use futures::stream::BoxStream;
use tracing::debug;

use crate::{error::ServiceError, traits::AuthService, types::UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthCall {
    SignIn,
    SignUp,
    SignOut,
    DeleteAccount,
}

struct Account {
    password: String,
    user_id: UserId,
}

/// Accounts keyed by email, with a single live session.
///
/// Failures can be scripted per call with [`fail_next`](Self::fail_next); every call is logged.
pub struct MemoryAuth {
    session: Mut<Option<UserId>>,
    accounts: Mutex<BTreeMap<String, Account>>,
    scripted: Mutex<HashMap<AuthCall, VecDeque<String>>>,
    calls: Mutex<Vec<AuthCall>>,
}

impl Default for MemoryAuth {
    fn default() -> Self { Self::new() }
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self {
            session: Mut::new(None),
            accounts: Mutex::new(BTreeMap::new()),
            scripted: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_account(self, user_id: impl Into<UserId>, email: &str, password: &str) -> Self {
        self.accounts.lock().expect("accounts lock is poisoned").insert(email.to_string(), Account { password: password.to_string(), user_id: user_id.into() });
        self
    }

    /// Start with `user_id` signed in
    pub fn with_session(self, user_id: impl Into<UserId>) -> Self {
        self.session.set(Some(user_id.into()));
        self
    }

    /// Make the next `call` fail with `code`
    pub fn fail_next(&self, call: AuthCall, code: &str) {
        self.scripted.lock().expect("scripted lock is poisoned").entry(call).or_default().push_back(code.to_string());
    }

    pub fn calls(&self) -> Vec<AuthCall> { self.calls.lock().expect("calls lock is poisoned").clone() }

    fn begin(&self, call: AuthCall) -> Result<(), ServiceError> {
        self.calls.lock().expect("calls lock is poisoned").push(call);
        let scripted = self.scripted.lock().expect("scripted lock is poisoned").get_mut(&call).and_then(VecDeque::pop_front);
        match scripted {
            Some(code) => Err(ServiceError::new(code, format!("scripted failure of {call:?}"))),
            None => Ok(()),
        }
    }

    fn set_session(&self, session: Option<UserId>) {
        debug!("session is now {session:?}");
        self.session.set(session);
    }
}

#[async_trait]
impl AuthService for MemoryAuth {
    fn current_session(&self) -> Option<UserId> { self.session.read().peek().flatten() }

    fn session_changes(&self) -> BoxStream<'static, Option<UserId>> { self.session.read().into_stream() }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), ServiceError> {
        self.begin(AuthCall::SignIn)?;
        let user_id = {
            let accounts = self.accounts.lock().expect("accounts lock is poisoned");
            let account = accounts.get(email).ok_or_else(|| ServiceError::new("user-not-found", format!("no account for {email}")))?;
            if account.password != password {
                return Err(ServiceError::new("wrong-password", "password does not match"));
            }
            account.user_id.clone()
        };
        self.set_session(Some(user_id));
        Ok(())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<(), ServiceError> {
        self.begin(AuthCall::SignUp)?;
        if !email.contains('@') {
            return Err(ServiceError::new("invalid-email", format!("{email} is not an email address")));
        }
        if password.len() < 6 {
            return Err(ServiceError::new("weak-password", "password is shorter than 6 characters"));
        }
        let user_id = {
            let mut accounts = self.accounts.lock().expect("accounts lock is poisoned");
            if accounts.contains_key(email) {
                return Err(ServiceError::new("email-already-in-use", format!("{email} is taken")));
            }
            let user_id = UserId::new(ulid::Ulid::new().to_string());
            accounts.insert(email.to_string(), Account { password: password.to_string(), user_id: user_id.clone() });
            user_id
        };
        self.set_session(Some(user_id));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        self.begin(AuthCall::SignOut)?;
        if self.current_session().is_none() {
            return Err(ServiceError::new("no-current-user", "nobody is signed in"));
        }
        self.set_session(None);
        Ok(())
    }

    async fn delete_current_account(&self) -> Result<(), ServiceError> {
        self.begin(AuthCall::DeleteAccount)?;
        let Some(current) = self.current_session() else { return Err(ServiceError::new("no-current-user", "nobody is signed in")) };
        self.accounts.lock().expect("accounts lock is poisoned").retain(|_, account| account.user_id != current);
        self.set_session(None);
        Ok(())
    }
}
