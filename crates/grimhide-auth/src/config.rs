//! Login settings.

use serde::{Deserialize, Serialize};

/// Key the session is stored under.
pub const DEFAULT_SESSION_KEY: &str = "grimhide_session_v1";
/// Key the remembered email is stored under.
pub const DEFAULT_REMEMBERED_EMAIL_KEY: &str = "grimhide_remembered_email";
/// How long the login spinner runs before the result is shown.
pub const SIMULATED_LOGIN_DELAY_MS: u64 = 1_000;
/// How long the success toast shows before redirecting.
pub const LOGIN_REDIRECT_DELAY_MS: u64 = 1_500;

/// Login configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Storage key for the session.
    pub session_key: String,
    /// Storage key for the remembered email.
    pub remembered_email_key: String,
    /// Emails that log in as admin, compared case-insensitively.
    pub admin_emails: Vec<String>,
    /// Login spinner duration.
    pub simulated_delay_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_key: DEFAULT_SESSION_KEY.to_string(),
            remembered_email_key: DEFAULT_REMEMBERED_EMAIL_KEY.to_string(),
            admin_emails: vec!["admin@store.com".to_string()],
            simulated_delay_ms: SIMULATED_LOGIN_DELAY_MS,
        }
    }
}

impl AuthConfig {
    /// Whether `email` logs in as admin.
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: AuthConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AuthConfig::default());
        assert!(config.is_admin_email("Admin@Store.com"));
        assert!(!config.is_admin_email("shopper@store.com"));
    }
}
