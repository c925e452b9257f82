//! Authentication primitives such as login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::AccessError;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Identifier was missing or blank once trimmed.
    EmptyIdentifier,
    /// Password was blank.
    EmptyPassword,
}

impl LoginValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::EmptyIdentifier => "identifier",
            Self::EmptyPassword => "password",
        }
    }
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIdentifier => write!(f, "username or email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

impl From<LoginValidationError> for AccessError {
    fn from(value: LoginValidationError) -> Self {
        AccessError::validation(value.field(), value)
    }
}

/// How the caller identified the account at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    /// Exact username match.
    Username(String),
    /// Case-insensitive email match; stored lowercased.
    Email(String),
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - the identifier is trimmed and must not be empty after trimming; it is
///   treated as an email when it contains `@`.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use notekeeper::domain::{LoginCredentials, LoginIdentifier};
///
/// let creds = LoginCredentials::try_from_parts(" Alice@X.com ", "password").unwrap();
/// assert_eq!(creds.identifier(), &LoginIdentifier::Email("alice@x.com".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    identifier: LoginIdentifier,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw identifier/password inputs.
    pub fn try_from_parts(identifier: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = identifier.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyIdentifier);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        let identifier = if normalized.contains('@') {
            LoginIdentifier::Email(normalized.to_lowercase())
        } else {
            LoginIdentifier::Username(normalized.to_owned())
        };

        Ok(Self {
            identifier,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Identifier used for the account lookup.
    pub fn identifier(&self) -> &LoginIdentifier {
        &self.identifier
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Copy of the secret for handing to the blocking pool.
    pub(crate) fn password_secret(&self) -> Zeroizing<String> {
        self.password.clone()
    }
}
