//! Login form validation.

use crate::AuthError;

/// What the login form submits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// "Remember me" checkbox.
    pub remember: bool,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>, remember: bool) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            remember,
        }
    }

    /// Check the form and return the trimmed email.
    pub fn validate(&self) -> Result<&str, AuthError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail(email.to_string()));
        }
        Ok(email)
    }
}

/// One `@`, a non-empty local part, and a dotted domain with no empty labels.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut labels = domain.split('.');
    let first = labels.next().unwrap_or_default();
    let rest: Vec<&str> = labels.collect();
    !first.is_empty() && !rest.is_empty() && rest.iter().all(|label| !label.is_empty())
}
