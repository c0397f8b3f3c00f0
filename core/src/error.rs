use thiserror::Error;

use crate::types::ContactId;

/// Failure reported by the auth collaborator: a machine-readable code plus a human message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ServiceError {
    pub code: String,
    pub message: String,
}

impl ServiceError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self { Self { code: code.into(), message: message.into() } }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("item {0} not found")]
    NotFound(ContactId),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store rejected the write: {0}")]
    Rejected(String),
}

/// Auth failures as the presentation layer sees them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,
    #[error("Weak password")]
    WeakPassword,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Email already in use")]
    EmailInUse,
    #[error("Operation not allowed")]
    OperationNotAllowed,
    #[error("Not signed in")]
    NoCurrentUser,
    #[error("Please sign in again")]
    RequiresRecentLogin,
    #[error("Something went wrong")]
    Unknown,
}

const CODES: &[(&str, AuthError)] = &[
    ("user-not-found", AuthError::UserNotFound),
    ("weak-password", AuthError::WeakPassword),
    ("invalid-email", AuthError::InvalidEmail),
    ("email-already-in-use", AuthError::EmailInUse),
    ("operation-not-allowed", AuthError::OperationNotAllowed),
    ("no-current-user", AuthError::NoCurrentUser),
    ("requires-recent-login", AuthError::RequiresRecentLogin),
];

impl AuthError {
    /// Map a collaborator error code. Surrounding whitespace and case are ignored; anything
    /// unrecognized is `Unknown`.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_lowercase();
        CODES.iter().find(|(known, _)| *known == code).map(|(_, error)| *error).unwrap_or(AuthError::Unknown)
    }

    /// Short heading for the error
    pub fn title(&self) -> String { self.to_string() }

    pub fn message(&self) -> &'static str {
        match self {
            AuthError::UserNotFound => "No account exists for this email address.",
            AuthError::WeakPassword => "The password must be at least 6 characters long.",
            AuthError::InvalidEmail => "The email address is badly formatted.",
            AuthError::EmailInUse => "An account already exists for this email address.",
            AuthError::OperationNotAllowed => "This sign-in method is not enabled.",
            AuthError::NoCurrentUser => "There is no signed-in user.",
            AuthError::RequiresRecentLogin => "This operation needs a recent sign-in. Sign in again and retry.",
            AuthError::Unknown => "An unexpected error occurred. Please try again.",
        }
    }
}

impl From<&ServiceError> for AuthError {
    fn from(error: &ServiceError) -> Self { Self::from_code(&error.code) }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number of milliseconds, got {value:?}")]
    InvalidDuration { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_normalized_before_lookup() {
        assert_eq!(AuthError::from_code("INVALID-EMAIL "), AuthError::from_code("invalid-email"));
        assert_eq!(AuthError::from_code(" User-Not-Found"), AuthError::UserNotFound);
    }

    #[test]
    fn unmatched_codes_fall_back_to_unknown() {
        assert_eq!(AuthError::from_code("wrong-password"), AuthError::Unknown);
        assert_eq!(AuthError::from_code(""), AuthError::Unknown);
        // no partial matches
        assert_eq!(AuthError::from_code("user-not-found-x"), AuthError::Unknown);
    }

    #[test]
    fn every_variant_has_copy() {
        for (code, error) in CODES {
            assert_eq!(AuthError::from_code(code), *error);
            assert!(!error.title().is_empty());
            assert!(!error.message().is_empty());
        }
    }
}
