//! Account use-cases: self-service sign-up and administrator management.

use std::sync::Arc;

use tracing::{info, warn};

use super::access_policy::{ensure_not_self, require_admin};
use super::password::hash_off_thread;
use super::{
    AccessError, Account, AccountId, AccountPatch, AccountRegistry, Caller, Email, NoteRegistry,
    OrderRegistry, Password, PasswordHasher, PostRegistry, Role, Username,
};

/// Administrator change request with raw inputs.
///
/// No `Debug` impl: it may carry a plaintext password.
#[derive(Clone, Default)]
pub struct AccountUpdate {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
}

/// Store-wide totals for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub total_accounts: u64,
    pub total_notes: u64,
    pub total_orders: u64,
    /// Blog posts across every author.
    pub total_posts: u64,
}

/// Account use-cases guarded by the access policy.
#[derive(Clone)]
pub struct AccountService {
    accounts: AccountRegistry,
    notes: NoteRegistry,
    orders: OrderRegistry,
    posts: PostRegistry,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    /// Wire the account registry plus the owned-record registries counted by
    /// [`AccountService::statistics`].
    pub fn new(
        accounts: AccountRegistry,
        notes: NoteRegistry,
        orders: OrderRegistry,
        posts: PostRegistry,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            accounts,
            notes,
            orders,
            posts,
            hasher,
        }
    }

    /// Registry handle, shared with the authenticator.
    pub fn registry(&self) -> &AccountRegistry {
        &self.accounts
    }

    /// Create an account without a caller, for trusted start-up code.
    ///
    /// Cheap fields and duplicates are checked before paying for a hash.
    pub async fn provision(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Account, AccessError> {
        let checked_username = Username::new(username)?;
        let checked_email = Email::new(email)?;
        let password = Password::new(password)?;
        if self.accounts.exists_by_username(checked_username.as_ref()).await? {
            return Err(AccessError::DuplicateUsername);
        }
        if self.accounts.exists_by_email(checked_email.as_ref()).await? {
            return Err(AccessError::DuplicateEmail);
        }

        let hash = hash_off_thread(self.hasher.clone(), password).await?;
        self.accounts.register(username, email, hash, role).await
    }

    /// Public registration; the role is always [`Role::Standard`].
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, AccessError> {
        self.provision(username, email, password, Role::Standard).await
    }

    /// Administrator-created account with any role.
    pub async fn create_account(
        &self,
        caller: &Caller,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Account, AccessError> {
        require_admin(caller)?;
        let account = self.provision(username, email, password, role).await?;
        info!(admin_id = %caller.id(), account_id = %account.id(), "account created by administrator");
        Ok(account)
    }

    /// Every account, oldest first. Administrators only.
    pub async fn list_accounts(&self, caller: &Caller) -> Result<Vec<Account>, AccessError> {
        require_admin(caller)?;
        self.accounts.list_all().await
    }

    /// One account by id; `NotFound` when absent. Administrators only.
    pub async fn get_account(&self, caller: &Caller, id: &AccountId) -> Result<Account, AccessError> {
        require_admin(caller)?;
        self.existing(id).await
    }

    /// Existence first, then validation; nothing changes if any field is bad.
    pub async fn update_account(
        &self,
        caller: &Caller,
        id: &AccountId,
        update: AccountUpdate,
    ) -> Result<Account, AccessError> {
        require_admin(caller)?;
        let account = self.existing(id).await?;

        let email = update.email.as_deref().map(Email::new).transpose()?;
        let password = update.password.as_deref().map(Password::new).transpose()?;
        let password_hash = match password {
            Some(password) => Some(hash_off_thread(self.hasher.clone(), password).await?),
            None => None,
        };

        self.accounts
            .update(
                &account,
                AccountPatch {
                    email,
                    role: update.role,
                    password_hash,
                },
            )
            .await
    }

    /// Delete another account and everything it owns.
    pub async fn delete_account(&self, caller: &Caller, id: &AccountId) -> Result<(), AccessError> {
        require_admin(caller)?;
        let account = self.existing(id).await?;
        if let Err(err) = ensure_not_self(caller, account.id()) {
            warn!(admin_id = %caller.id(), "administrator attempted self-deletion");
            return Err(err);
        }
        self.accounts.delete(&account).await
    }

    /// Load the account behind a session, if it still exists.
    pub async fn resolve_account(&self, id: &AccountId) -> Result<Option<Account>, AccessError> {
        self.accounts.find_by_id(id).await
    }

    /// Build the caller identity for a session account id.
    pub async fn resolve_caller(&self, id: &AccountId) -> Result<Option<Caller>, AccessError> {
        Ok(self
            .resolve_account(id)
            .await?
            .map(|account| Caller::new(account.id(), account.role())))
    }

    /// Store-wide totals. Administrators only.
    pub async fn statistics(&self, caller: &Caller) -> Result<Statistics, AccessError> {
        require_admin(caller)?;
        Ok(Statistics {
            total_accounts: self.accounts.count_all().await?,
            total_notes: self.notes.count_all().await?,
            total_orders: self.orders.count_all().await?,
            total_posts: self.posts.count_all().await?,
        })
    }

    async fn existing(&self, id: &AccountId) -> Result<Account, AccessError> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or(AccessError::not_found("account"))
    }
}
