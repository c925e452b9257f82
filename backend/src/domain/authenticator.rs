//! Credential verification with equalised timing for unknown accounts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::password::verify_off_thread;
use super::ports::LoginService;
use super::{
    AccessError, Account, AccountRegistry, LoginCredentials, LoginIdentifier, Password,
    PasswordHash, PasswordHasher,
};

const DUMMY_SECRET: &str = "timing-equaliser-not-a-credential";

/// Turns login credentials into a verified account.
///
/// When no account matches the identifier, the secret is still verified
/// against a dummy hash so both failure paths cost one hash verification.
#[derive(Clone)]
pub struct Authenticator {
    accounts: AccountRegistry,
    hasher: Arc<dyn PasswordHasher>,
    dummy_hash: PasswordHash,
}

impl Authenticator {
    /// Build an authenticator over the account registry.
    ///
    /// Computes the dummy hash up front, on the calling thread, so the first
    /// unknown-identifier login costs the same as every later one. Call it
    /// while wiring the application, not from a request handler.
    ///
    /// # Errors
    /// Returns [`AccessError::Internal`] when the hasher cannot produce the
    /// dummy hash.
    pub fn new(
        accounts: AccountRegistry,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Result<Self, AccessError> {
        let secret = Password::new(DUMMY_SECRET)?;
        let dummy_hash = hasher
            .hash(&secret)
            .map_err(|err| AccessError::internal(err.to_string()))?;
        Ok(Self {
            accounts,
            hasher,
            dummy_hash,
        })
    }

    /// Return the account only when the identifier and secret both match.
    pub async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<Account>, AccessError> {
        let found = match credentials.identifier() {
            LoginIdentifier::Username(username) => self.accounts.find_by_username(username).await?,
            LoginIdentifier::Email(email) => self.accounts.find_by_email(email).await?,
        };

        let hash = match &found {
            Some(account) => account.password_hash().clone(),
            None => self.dummy_hash.clone(),
        };
        let matched =
            verify_off_thread(self.hasher.clone(), credentials.password_secret(), hash).await?;

        match found {
            Some(account) if matched => {
                info!(account_id = %account.id(), "authentication succeeded");
                Ok(Some(account))
            }
            Some(account) => {
                debug!(account_id = %account.id(), "authentication failed: secret mismatch");
                Ok(None)
            }
            None => {
                debug!("authentication failed: unknown identifier");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl LoginService for Authenticator {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Account, AccessError> {
        self.authenticate(credentials)
            .await?
            .ok_or(AccessError::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::domain::password::MockPasswordHasher;
    use crate::outbound::persistence::InMemoryStore;
    use crate::test_support::{MutableClock, cheap_hasher, fixture_timestamp};
    use rstest::{fixture, rstest};

    struct Setup {
        authenticator: Authenticator,
        alice: Account,
    }

    #[fixture]
    async fn setup() -> Setup {
        let registry = AccountRegistry::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(MutableClock::new(fixture_timestamp())),
        );
        let hasher = cheap_hasher();
        let hash = hasher
            .hash(&Password::new("password1").expect("valid"))
            .expect("hash");
        let alice = registry
            .register("alice", "alice@x.com", hash, Role::Standard)
            .await
            .expect("register");
        Setup {
            authenticator: Authenticator::new(registry, hasher).expect("dummy hash"),
            alice,
        }
    }

    fn creds(identifier: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(identifier, password).expect("credential shape")
    }

    #[rstest]
    #[case("alice")]
    #[case("ALICE@x.com")]
    #[tokio::test]
    async fn correct_secret_returns_the_account(
        #[future] setup: Setup,
        #[case] identifier: &str,
    ) {
        let setup = setup.await;
        let account = setup
            .authenticator
            .authenticate(&creds(identifier, "password1"))
            .await
            .expect("lookup succeeds");
        assert_eq!(account.map(|a| a.id()), Some(setup.alice.id()));
    }

    #[rstest]
    #[case("alice", "wrong")]
    #[case("nobody", "password1")]
    #[case("nobody@x.com", "anything")]
    #[tokio::test]
    async fn failures_are_indistinguishable(
        #[future] setup: Setup,
        #[case] identifier: &str,
        #[case] password: &str,
    ) {
        let setup = setup.await;
        let outcome = setup
            .authenticator
            .authenticate(&creds(identifier, password))
            .await;
        assert_eq!(outcome, Ok(None));

        let error = setup
            .authenticator
            .login(&creds(identifier, password))
            .await
            .expect_err("login fails");
        assert_eq!(error, AccessError::AuthenticationFailed);
        assert_eq!(error.to_string(), "invalid credentials");
    }

    #[rstest]
    fn dummy_hash_is_computed_while_wiring() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Ok(PasswordHash::from_phc("dummy")));
        hasher.expect_verify().never();
        let registry = AccountRegistry::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(MutableClock::new(fixture_timestamp())),
        );

        let authenticator = Authenticator::new(registry, Arc::new(hasher));
        assert!(authenticator.is_ok());
    }

    #[rstest]
    fn hasher_failures_abort_wiring() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Err(crate::domain::PasswordHashError::new("no entropy")));
        let registry = AccountRegistry::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(MutableClock::new(fixture_timestamp())),
        );

        let err = Authenticator::new(registry, Arc::new(hasher)).err();
        assert!(matches!(err, Some(AccessError::Internal { .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_accounts_still_pay_for_one_verification() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Ok(PasswordHash::from_phc("dummy")));
        hasher
            .expect_verify()
            .times(2)
            .returning(|_, _| false);
        let registry = AccountRegistry::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(MutableClock::new(fixture_timestamp())),
        );
        let authenticator = Authenticator::new(registry, Arc::new(hasher)).expect("dummy hash");

        for _ in 0..2 {
            let outcome = authenticator.authenticate(&creds("ghost", "secret")).await;
            assert_eq!(outcome, Ok(None));
        }
    }
}
