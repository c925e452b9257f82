//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the login port and the use-case services, and remain testable
//! against the in-memory store.

use std::sync::Arc;

use crate::domain::ports::LoginService;
use crate::domain::{AccountService, NoteService, OrderService, PostService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: AccountService,
    pub notes: NoteService,
    pub orders: OrderService,
    pub posts: PostService,
}

impl HttpState {
    /// Construct state from the login port and the use-case services.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use notekeeper::domain::{
    ///     AccountRegistry, AccountService, Authenticator, NoteRegistry, NoteService,
    ///     OrderRegistry, OrderService, PostRegistry, PostService,
    /// };
    /// use notekeeper::inbound::http::state::HttpState;
    /// use notekeeper::outbound::hashing::Argon2PasswordHasher;
    /// use notekeeper::outbound::persistence::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let clock = Arc::new(DefaultClock);
    /// let hasher = Arc::new(Argon2PasswordHasher::new());
    /// let accounts = AccountRegistry::new(store.clone(), clock.clone());
    /// let notes = NoteRegistry::new(store.clone(), clock.clone());
    /// let orders = OrderRegistry::new(store.clone(), clock.clone());
    /// let posts = PostRegistry::new(store, clock);
    /// let login = Authenticator::new(accounts.clone(), hasher.clone()).expect("dummy hash");
    /// let state = HttpState::new(
    ///     Arc::new(login),
    ///     AccountService::new(accounts, notes.clone(), orders.clone(), posts.clone(), hasher),
    ///     NoteService::new(notes),
    ///     OrderService::new(orders),
    ///     PostService::new(posts),
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        accounts: AccountService,
        notes: NoteService,
        orders: OrderService,
        posts: PostService,
    ) -> Self {
        Self {
            login,
            accounts,
            notes,
            orders,
            posts,
        }
    }
}
