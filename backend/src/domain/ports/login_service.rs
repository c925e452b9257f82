//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing the backing store or hasher.
//! HTTP handler tests substitute a mock instead of wiring real hashing.

use async_trait::async_trait;

use crate::domain::{AccessError, Account, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated account.
    ///
    /// Unknown accounts and wrong secrets both yield
    /// [`AccessError::AuthenticationFailed`].
    async fn login(&self, credentials: &LoginCredentials) -> Result<Account, AccessError>;
}
