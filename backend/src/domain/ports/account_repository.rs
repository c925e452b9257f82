//! Port for account persistence with store-enforced uniqueness.

use async_trait::async_trait;

use crate::domain::{AccessError, Account, AccountId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Another account already holds the username.
        DuplicateUsername => "username is already taken",
        /// Another account already holds the email address.
        DuplicateEmail => "email is already registered",
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
    }
}

impl From<AccountRepositoryError> for AccessError {
    fn from(value: AccountRepositoryError) -> Self {
        match value {
            AccountRepositoryError::DuplicateUsername => AccessError::DuplicateUsername,
            AccountRepositoryError::DuplicateEmail => AccessError::DuplicateEmail,
            AccountRepositoryError::Connection { message } => AccessError::unavailable(message),
            AccountRepositoryError::Query { message } => AccessError::internal(message),
        }
    }
}

/// Port for storing accounts.
///
/// Adapters must make `insert` and `update` atomic with respect to the
/// uniqueness of usernames and (case-insensitive) emails, and must remove an
/// account's owned resources in the same unit of work as the account itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account unless the username or email is already taken.
    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Fetch an account by exact username.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, AccountRepositoryError>;

    /// Fetch an account by email, ignoring case.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountRepositoryError>;

    /// Every account, oldest first.
    async fn list_all(&self) -> Result<Vec<Account>, AccountRepositoryError>;

    /// Number of stored accounts.
    async fn count_all(&self) -> Result<u64, AccountRepositoryError>;

    /// Replace a stored account. Returns `false` when it no longer exists.
    async fn update(&self, account: &Account) -> Result<bool, AccountRepositoryError>;

    /// Remove an account and everything it owns. Returns `false` when absent.
    async fn delete(&self, id: &AccountId) -> Result<bool, AccountRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AccountRepositoryError::duplicate_username(), AccessError::DuplicateUsername)]
    #[case(AccountRepositoryError::duplicate_email(), AccessError::DuplicateEmail)]
    #[case(
        AccountRepositoryError::connection("refused"),
        AccessError::unavailable("refused")
    )]
    #[case(AccountRepositoryError::query("syntax"), AccessError::internal("syntax"))]
    fn maps_to_access_errors(#[case] error: AccountRepositoryError, #[case] expected: AccessError) {
        assert_eq!(AccessError::from(error), expected);
    }
}
