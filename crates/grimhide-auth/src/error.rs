//! Authentication errors.

use grimhide_storage::StorageError;
use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Email or password left empty.
    #[error("please fill in all fields")]
    MissingFields,

    /// Email is not shaped like an address.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// Social provider name is empty or not a bare name.
    #[error("invalid login provider: {0:?}")]
    InvalidProvider(String),

    /// Session storage failed.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Whether the user can fix this by correcting the form.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingFields | AuthError::InvalidEmail(_) | AuthError::InvalidProvider(_)
        )
    }
}
