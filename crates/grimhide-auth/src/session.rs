//! Session persistence.

use grimhide_storage::{Cache, WebStorage};
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::login::LoginForm;
use crate::token::{current_timestamp, generate_token};
use crate::user::{LoginMethod, Role, Session};
use crate::AuthError;

/// Reads and writes the visitor's session in browser storage.
///
/// Login is simulated: any well-formed form succeeds. Whatever is stored
/// under the session key decides whether the visitor is logged in; data
/// that does not parse counts as logged out.
#[derive(Debug)]
pub struct SessionStore<S> {
    cache: Cache<S>,
    config: AuthConfig,
}

impl<S: WebStorage> SessionStore<S> {
    /// Create a store with the default keys and admin list.
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, AuthConfig::default())
    }

    pub fn with_config(storage: S, config: AuthConfig) -> Self {
        Self {
            cache: Cache::new(storage),
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Log in with the email form.
    ///
    /// Admin emails get [`Role::Admin`]. With "remember me" ticked the email
    /// is kept for pre-filling the form; unticked, any remembered email is
    /// forgotten.
    pub fn login(&self, form: &LoginForm) -> Result<Session, AuthError> {
        let email = form.validate()?;
        let role = if self.config.is_admin_email(email) {
            Role::Admin
        } else {
            Role::Customer
        };

        let session = self.start(email.to_string(), role, LoginMethod::Password, form.remember)?;
        if form.remember {
            self.cache
                .set_raw(&self.config.remembered_email_key, &session.email)?;
        } else {
            self.cache.delete(&self.config.remembered_email_key)?;
        }
        Ok(session)
    }

    /// Log in through a social provider button, e.g. `"google"`.
    ///
    /// The session belongs to `user@<provider>.com`.
    pub fn social_login(&self, provider: &str) -> Result<Session, AuthError> {
        let provider = provider.trim().to_ascii_lowercase();
        if provider.is_empty() || !provider.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(AuthError::InvalidProvider(provider));
        }

        let email = format!("user@{provider}.com");
        self.start(email, Role::Customer, LoginMethod::Social(provider), false)
    }

    /// The current session, if any.
    pub fn current(&self) -> Option<Session> {
        match self.cache.get::<Session>(&self.config.session_key) {
            Ok(session) => session,
            Err(e) => {
                warn!(key = %self.config.session_key, error = %e, "unreadable session, treating as logged out");
                None
            }
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.current().is_some()
    }

    /// The email to pre-fill the login form with.
    pub fn remembered_email(&self) -> Option<String> {
        self.cache
            .get_raw(&self.config.remembered_email_key)
            .unwrap_or_else(|e| {
                warn!(error = %e, "remembered email unavailable");
                None
            })
            .filter(|email| !email.is_empty())
    }

    /// End the session. The remembered email stays.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.cache.delete(&self.config.session_key)?;
        info!("logged out");
        Ok(())
    }

    fn start(
        &self,
        email: String,
        role: Role,
        method: LoginMethod,
        remember: bool,
    ) -> Result<Session, AuthError> {
        let session = Session {
            email,
            role,
            method,
            remember,
            token: generate_token(),
            created_at: current_timestamp(),
        };
        self.cache.set(&self.config.session_key, &session)?;
        info!(email = %session.email, role = session.role.as_str(), method = %session.method, "logged in");
        Ok(session)
    }
}
