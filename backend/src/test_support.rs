//! Shared test doubles for unit tests across the crate.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::AccountRepository;
use crate::domain::{
    Account, AccountId, AccountRegistry, AccountService, Caller, Email, NoteRegistry,
    NoteService, OrderRegistry, OrderService, PasswordHash, PasswordHasher, PostRegistry,
    PostService, Role, Username,
};
use crate::outbound::hashing::Argon2PasswordHasher;
use crate::outbound::persistence::InMemoryStore;

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Argon2id at the minimum cost so tests stay fast.
pub fn cheap_hasher() -> Arc<dyn PasswordHasher> {
    Arc::new(
        Argon2PasswordHasher::with_cost(Some(argon2::Params::MIN_M_COST), Some(1), Some(1))
            .expect("minimum argon2 cost is valid"),
    )
}

/// Insert an account straight into `store` with an unusable hash.
///
/// Owned records are only accepted for live owners, so registry tests
/// create their owners through this.
pub async fn stored_account(store: &InMemoryStore, username: &str, role: Role) -> AccountId {
    let account = Account::new(
        AccountId::random(),
        Username::new(username).expect("valid username"),
        Email::new(format!("{username}@example.com")).expect("valid email"),
        PasswordHash::from_phc("$argon2id$stub"),
        role,
        fixture_timestamp(),
    );
    AccountRepository::insert(store, &account)
        .await
        .expect("insert account");
    account.id()
}

/// Services wired to one in-memory store and a controllable clock.
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
    pub accounts: AccountService,
    pub notes: NoteService,
    pub orders: OrderService,
    pub posts: PostService,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(MutableClock::new(fixture_timestamp()));
        let account_registry = AccountRegistry::new(store.clone(), clock.clone());
        let note_registry = NoteRegistry::new(store.clone(), clock.clone());
        let order_registry = OrderRegistry::new(store.clone(), clock.clone());
        let post_registry = PostRegistry::new(store.clone(), clock.clone());
        Self {
            accounts: AccountService::new(
                account_registry,
                note_registry.clone(),
                order_registry.clone(),
                post_registry.clone(),
                cheap_hasher(),
            ),
            notes: NoteService::new(note_registry),
            orders: OrderService::new(order_registry),
            posts: PostService::new(post_registry),
            store,
            clock,
        }
    }

    /// Store an account and return its caller identity.
    pub async fn member(&self, username: &str, role: Role) -> Caller {
        Caller::new(stored_account(&self.store, username, role).await, role)
    }
}
