//! Session and role types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular customer.
    #[default]
    Customer,
    /// Store administrator.
    Admin,
}

impl Role {
    /// Get role as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }

    /// Check if this role has at least the given permission level.
    pub fn has_permission(&self, required: Role) -> bool {
        self.level() >= required.level()
    }

    /// Get permission level (higher = more permissions).
    pub fn level(&self) -> u8 {
        match self {
            Role::Customer => 0,
            Role::Admin => 1,
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

/// How the session was started.
///
/// Stored as `"password"` or the provider name, e.g. `"google"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LoginMethod {
    /// Email and password form.
    Password,
    /// Social provider button.
    Social(String),
}

impl LoginMethod {
    pub fn as_str(&self) -> &str {
        match self {
            LoginMethod::Password => "password",
            LoginMethod::Social(provider) => provider,
        }
    }
}

impl fmt::Display for LoginMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for LoginMethod {
    fn from(s: String) -> Self {
        if s == "password" {
            LoginMethod::Password
        } else {
            LoginMethod::Social(s)
        }
    }
}

impl From<LoginMethod> for String {
    fn from(method: LoginMethod) -> Self {
        match method {
            LoginMethod::Password => "password".to_string(),
            LoginMethod::Social(provider) => provider,
        }
    }
}

/// A logged-in visitor, as persisted under the session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Email address.
    pub email: String,
    /// Role granted at login.
    pub role: Role,
    /// How the visitor logged in.
    pub method: LoginMethod,
    /// Whether "remember me" was ticked.
    #[serde(default)]
    pub remember: bool,
    /// Opaque random token.
    pub token: String,
    /// Unix timestamp of login.
    pub created_at: i64,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Name shown in the header: the part of the email before `@`.
    pub fn display_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }

    /// Page to send the visitor to after login.
    pub fn landing_page(&self) -> &'static str {
        match self.role {
            Role::Admin => "admin-dashboard.html",
            Role::Customer => "index.html",
        }
    }
}
