//! Credential primitives and the password hashing port.
//!
//! Plaintext secrets only ever live inside [`Password`] (zeroised on drop)
//! and stored secrets only inside [`PasswordHash`], which is opaque: it has no
//! `Display`, no serde support and a redacted `Debug`.

use std::fmt;
use std::sync::Arc;

use zeroize::Zeroizing;

use super::AccessError;

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN: usize = 6;
/// Maximum accepted password length, in characters.
pub const PASSWORD_MAX: usize = 128;

/// Password policy violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordValidationError {
    TooShort { min: usize },
    TooLong { max: usize },
}

impl fmt::Display for PasswordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { min } => write!(f, "password must be at least {min} characters"),
            Self::TooLong { max } => write!(f, "password must be at most {max} characters"),
        }
    }
}

impl std::error::Error for PasswordValidationError {}

impl From<PasswordValidationError> for AccessError {
    fn from(value: PasswordValidationError) -> Self {
        AccessError::validation("password", value)
    }
}

/// Plaintext password that satisfies the password policy.
///
/// # Examples
/// ```
/// use notekeeper::domain::Password;
///
/// assert!(Password::new("password1").is_ok());
/// assert!(Password::new("short").is_err());
/// ```
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a candidate password against the policy.
    pub fn new(raw: &str) -> Result<Self, PasswordValidationError> {
        let length = raw.chars().count();
        if length < PASSWORD_MIN {
            return Err(PasswordValidationError::TooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(PasswordValidationError::TooLong { max: PASSWORD_MAX });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Borrow the plaintext for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// One-way salted digest of a password, in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a PHC string produced by a [`PasswordHasher`] or read from storage.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// PHC representation for persistence adapters and verifiers.
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Raised when a hash cannot be computed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    message: String,
}

impl PasswordHashError {
    /// Wrap an underlying hashing failure.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Port for one-way password hashing.
///
/// Implementations are deliberately expensive; async callers must go through
/// [`hash_off_thread`] and [`verify_off_thread`].
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted digest; two calls with the same input differ.
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError>;

    /// Check `candidate` against `hash`. Malformed hashes yield `false`.
    fn verify(&self, candidate: &str, hash: &PasswordHash) -> bool;
}

/// Hash on the blocking pool so request workers stay responsive.
pub async fn hash_off_thread(
    hasher: Arc<dyn PasswordHasher>,
    password: Password,
) -> Result<PasswordHash, AccessError> {
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|err| AccessError::internal(format!("hashing task failed: {err}")))?
        .map_err(|err| AccessError::internal(err.to_string()))
}

/// Verify on the blocking pool so request workers stay responsive.
pub async fn verify_off_thread(
    hasher: Arc<dyn PasswordHasher>,
    candidate: Zeroizing<String>,
    hash: PasswordHash,
) -> Result<bool, AccessError> {
    tokio::task::spawn_blocking(move || hasher.verify(candidate.as_str(), &hash))
        .await
        .map_err(|err| AccessError::internal(format!("verification task failed: {err}")))
}
