//! Login and session handling for the GrimHide storefront.
//!
//! Login is simulated: a well-formed form always succeeds and the session
//! lives in browser storage next to the cart.
//!
//! ```rust
//! use grimhide_auth::{LoginForm, Role, SessionStore};
//! use grimhide_storage::MemoryOrigin;
//!
//! let origin = MemoryOrigin::new();
//! let sessions = SessionStore::new(origin.open_tab());
//!
//! let session = sessions
//!     .login(&LoginForm::new("admin@store.com", "admin123", true))
//!     .unwrap();
//! assert_eq!(session.role, Role::Admin);
//! assert!(sessions.is_logged_in());
//! ```

mod config;
mod error;
mod login;
mod session;
mod token;
mod user;

pub use config::{
    AuthConfig, DEFAULT_REMEMBERED_EMAIL_KEY, DEFAULT_SESSION_KEY, LOGIN_REDIRECT_DELAY_MS,
    SIMULATED_LOGIN_DELAY_MS,
};
pub use error::AuthError;
pub use login::{is_valid_email, LoginForm};
pub use session::SessionStore;
pub use user::{LoginMethod, Role, Session};
