use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Identifier of an authenticated user, as issued by the auth collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self { Self::new(id) }
}

/// Identifier of a contact. Fresh ids are ULIDs minted on the client; ids coming back from a
/// store are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

    pub fn generate() -> Self { Self(Ulid::new().to_string()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

impl From<&str> for ContactId {
    fn from(id: &str) -> Self { Self::new(id) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default = "ContactId::generate")]
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

impl Contact {
    /// A contact with a freshly generated id
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self { id: ContactId::generate(), first_name: first_name.into(), last_name: last_name.into(), phone_number: phone_number.into() }
    }

    pub fn full_name(&self) -> String { format!("{} {}", self.first_name, self.last_name) }

    /// Case-insensitive prefix match against the first name, last name or full name
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        [self.first_name.to_lowercase(), self.last_name.to_lowercase(), self.full_name().to_lowercase()]
            .iter()
            .any(|name| name.starts_with(&term))
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterCommand {
    pub email: String,
    pub password: String,
}

// passwords stay out of logs
impl std::fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCommand").field("email", &self.email).finish_non_exhaustive()
    }
}

impl std::fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterCommand").field("email", &self.email).finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthStatus {
    LoggedIn,
    LoggedOut,
}

impl AuthStatus {
    pub fn from_session(session: &Option<UserId>) -> Self { if session.is_some() { Self::LoggedIn } else { Self::LoggedOut } }
}

/// The screen the presentation layer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrentView {
    Login,
    Register,
    ContactList,
    CreateContact,
}
