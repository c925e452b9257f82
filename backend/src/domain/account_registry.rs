//! Account registry: validated registration and lookups over the store.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use super::ports::AccountRepository;
use super::{AccessError, Account, AccountId, AccountPatch, Email, PasswordHash, Role, Username};

/// Registry of accounts backed by an [`AccountRepository`].
#[derive(Clone)]
pub struct AccountRegistry {
    repository: Arc<dyn AccountRepository>,
    clock: Arc<dyn Clock>,
}

impl AccountRegistry {
    /// Build a registry over `repository`, stamping accounts with `clock`.
    pub fn new(repository: Arc<dyn AccountRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Register a new account from raw username/email input.
    ///
    /// The existence pre-checks only produce a friendlier error early; the
    /// repository's atomic insert is what actually enforces uniqueness.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password_hash: PasswordHash,
        role: Role,
    ) -> Result<Account, AccessError> {
        let username = Username::new(username)?;
        let email = Email::new(email)?;

        if self.exists_by_username(username.as_ref()).await? {
            return Err(AccessError::DuplicateUsername);
        }
        if self.exists_by_email(email.as_ref()).await? {
            return Err(AccessError::DuplicateEmail);
        }

        let account = Account::new(
            AccountId::random(),
            username,
            email,
            password_hash,
            role,
            self.clock.utc(),
        );
        self.repository.insert(&account).await?;
        info!(account_id = %account.id(), role = %account.role(), "account registered");
        Ok(account)
    }

    /// Fetch an account by identifier.
    pub async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccessError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Fetch an account by exact username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AccessError> {
        Ok(self.repository.find_by_username(username).await?)
    }

    /// Case-insensitive lookup.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccessError> {
        Ok(self.repository.find_by_email(&email.trim().to_lowercase()).await?)
    }

    /// Whether `register` would reject `username` as taken.
    pub async fn exists_by_username(&self, username: &str) -> Result<bool, AccessError> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    /// Whether `register` would reject `email` as taken; case-insensitive.
    pub async fn exists_by_email(&self, email: &str) -> Result<bool, AccessError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    /// Every account, oldest first.
    pub async fn list_all(&self) -> Result<Vec<Account>, AccessError> {
        Ok(self.repository.list_all().await?)
    }

    /// Number of stored accounts.
    pub async fn count_all(&self) -> Result<u64, AccessError> {
        Ok(self.repository.count_all().await?)
    }

    /// Apply `patch` to `account`. An empty patch returns the account as is.
    pub async fn update(&self, account: &Account, patch: AccountPatch) -> Result<Account, AccessError> {
        if patch.is_empty() {
            return Ok(account.clone());
        }
        let mut updated = account.clone();
        updated.apply(patch);
        if !self.repository.update(&updated).await? {
            return Err(AccessError::not_found("account"));
        }
        info!(account_id = %updated.id(), role = %updated.role(), "account updated");
        Ok(updated)
    }

    /// Remove the account and cascade to everything it owns.
    pub async fn delete(&self, account: &Account) -> Result<(), AccessError> {
        if !self.repository.delete(&account.id()).await? {
            return Err(AccessError::not_found("account"));
        }
        info!(account_id = %account.id(), "account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{AccountRepositoryError, MockAccountRepository};
    use crate::outbound::persistence::InMemoryStore;
    use crate::test_support::{MutableClock, fixture_timestamp};
    use rstest::{fixture, rstest};

    fn hash() -> PasswordHash {
        PasswordHash::from_phc("$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA")
    }

    #[fixture]
    fn registry() -> AccountRegistry {
        AccountRegistry::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(MutableClock::new(fixture_timestamp())),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn registers_and_finds_accounts(registry: AccountRegistry) {
        let account = registry
            .register("alice", "Alice@X.com", hash(), Role::Standard)
            .await
            .expect("registration succeeds");

        assert_eq!(account.email().as_ref(), "alice@x.com");
        assert_eq!(account.created_at(), fixture_timestamp());
        let by_name = registry.find_by_username("alice").await.expect("lookup");
        assert_eq!(by_name.as_ref().map(Account::id), Some(account.id()));
        let by_email = registry.find_by_email("ALICE@x.com").await.expect("lookup");
        assert_eq!(by_email.map(|a| a.id()), Some(account.id()));
        assert!(registry.exists_by_email("alice@X.COM").await.expect("exists"));
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_username_is_rejected_without_side_effects(registry: AccountRegistry) {
        registry
            .register("alice", "alice@x.com", hash(), Role::Standard)
            .await
            .expect("first");
        let err = registry
            .register("alice", "bob@x.com", hash(), Role::Standard)
            .await
            .expect_err("duplicate");

        assert_eq!(err, AccessError::DuplicateUsername);
        assert_eq!(registry.count_all().await, Ok(1));
        assert!(!registry.exists_by_email("bob@x.com").await.expect("exists"));
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_ignores_case(registry: AccountRegistry) {
        registry
            .register("alice", "alice@x.com", hash(), Role::Standard)
            .await
            .expect("first");
        let err = registry
            .register("bob", "ALICE@X.COM", hash(), Role::Standard)
            .await
            .expect_err("duplicate");
        assert_eq!(err, AccessError::DuplicateEmail);
    }

    #[rstest]
    #[case("ab", "ab@x.com", "username")]
    #[case("bad name", "bad@x.com", "username")]
    #[case("carol", "carol-at-x", "email")]
    #[tokio::test]
    async fn invalid_fields_fail_validation(
        registry: AccountRegistry,
        #[case] username: &str,
        #[case] email: &str,
        #[case] field: &str,
    ) {
        let err = registry
            .register(username, email, hash(), Role::Standard)
            .await
            .expect_err("invalid");
        assert!(matches!(err, AccessError::ValidationFailed { field: f, .. } if f == field));
        assert_eq!(registry.count_all().await, Ok(0));
    }

    #[rstest]
    #[tokio::test]
    async fn insert_race_losers_map_to_duplicate_errors() {
        let mut repository = MockAccountRepository::new();
        repository.expect_find_by_username().returning(|_| Ok(None));
        repository.expect_find_by_email().returning(|_| Ok(None));
        repository
            .expect_insert()
            .times(1)
            .returning(|_| Err(AccountRepositoryError::duplicate_username()));
        let registry = AccountRegistry::new(
            Arc::new(repository),
            Arc::new(MutableClock::new(fixture_timestamp())),
        );

        let err = registry
            .register("alice", "alice@x.com", hash(), Role::Standard)
            .await
            .expect_err("lost the race");
        assert_eq!(err, AccessError::DuplicateUsername);
    }

    #[rstest]
    #[tokio::test]
    async fn connection_failures_are_unavailable() {
        let mut repository = MockAccountRepository::new();
        repository
            .expect_find_by_username()
            .returning(|_| Err(AccountRepositoryError::connection("refused")));
        let registry = AccountRegistry::new(
            Arc::new(repository),
            Arc::new(MutableClock::new(fixture_timestamp())),
        );
        let err = registry
            .register("alice", "alice@x.com", hash(), Role::Standard)
            .await
            .expect_err("store down");
        assert!(matches!(err, AccessError::Unavailable { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn update_changes_role_and_keeps_the_rest(registry: AccountRegistry) {
        let account = registry
            .register("alice", "alice@x.com", hash(), Role::Standard)
            .await
            .expect("register");
        let updated = registry
            .update(
                &account,
                AccountPatch {
                    role: Some(Role::Administrator),
                    ..AccountPatch::default()
                },
            )
            .await
            .expect("update");

        assert!(updated.is_admin());
        let stored = registry.find_by_id(&account.id()).await.expect("lookup");
        assert_eq!(stored, Some(updated));
    }

    #[rstest]
    #[tokio::test]
    async fn lists_oldest_first(registry: AccountRegistry) {
        for name in ["first", "second", "third"] {
            registry
                .register(name, &format!("{name}@x.com"), hash(), Role::Standard)
                .await
                .expect("register");
        }
        let names: Vec<String> = registry
            .list_all()
            .await
            .expect("list")
            .iter()
            .map(|a| a.username().to_string())
            .collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_removes_the_account(registry: AccountRegistry) {
        let account = registry
            .register("alice", "alice@x.com", hash(), Role::Standard)
            .await
            .expect("register");
        registry.delete(&account).await.expect("delete");
        assert_eq!(registry.find_by_id(&account.id()).await, Ok(None));
        assert_eq!(
            registry.delete(&account).await,
            Err(AccessError::not_found("account"))
        );
    }
}
