//! Process-local store implementing the account, note, order and post ports.
//!
//! Every operation takes one `std::sync::Mutex` for its whole critical
//! section and never across an `.await`, so uniqueness checks and inserts
//! are a single atomic step and account deletion cascades in the same step.
//! Owned records are only accepted while their owner exists, checked under
//! the same lock, so a cascade can never be outrun by a late insert.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, NoteRepository, NoteRepositoryError,
    OrderRepository, OrderRepositoryError, PostRepository, PostRepositoryError,
};
use crate::domain::{Account, AccountId, Note, NoteId, Order, OrderId, Post, PostId};

const POISONED: &str = "in-memory store lock poisoned";

/// Records with a single owning account.
trait OwnedRecord: Clone {
    type Id: Copy + Eq + Hash;

    fn record_id(&self) -> Self::Id;
    fn owner(&self) -> AccountId;
    fn created(&self) -> DateTime<Utc>;
}

impl OwnedRecord for Note {
    type Id = NoteId;

    fn record_id(&self) -> NoteId {
        self.id()
    }

    fn owner(&self) -> AccountId {
        self.owner_id()
    }

    fn created(&self) -> DateTime<Utc> {
        self.created_at()
    }
}

impl OwnedRecord for Order {
    type Id = OrderId;

    fn record_id(&self) -> OrderId {
        self.id()
    }

    fn owner(&self) -> AccountId {
        self.owner_id()
    }

    fn created(&self) -> DateTime<Utc> {
        self.created_at()
    }
}

impl OwnedRecord for Post {
    type Id = PostId;

    fn record_id(&self) -> PostId {
        self.id()
    }

    fn owner(&self) -> AccountId {
        self.author_id()
    }

    fn created(&self) -> DateTime<Utc> {
        self.created_at()
    }
}

/// Stored value plus its insertion sequence, used to break timestamp ties.
struct Row<T> {
    seq: u64,
    record: T,
}

struct OwnedTable<T: OwnedRecord> {
    rows: HashMap<T::Id, Row<T>>,
    next_seq: u64,
}

impl<T: OwnedRecord> Default for OwnedTable<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T: OwnedRecord> OwnedTable<T> {
    fn insert(&mut self, record: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.rows.insert(record.record_id(), Row { seq, record });
    }

    fn get(&self, id: &T::Id) -> Option<T> {
        self.rows.get(id).map(|row| row.record.clone())
    }

    /// Matching records, newest first; ties go to the later insert.
    fn newest_first(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows: Vec<&Row<T>> = self.rows.values().filter(|row| keep(&row.record)).collect();
        rows.sort_by(|a, b| {
            b.record
                .created()
                .cmp(&a.record.created())
                .then_with(|| b.seq.cmp(&a.seq))
        });
        rows.into_iter().map(|row| row.record.clone()).collect()
    }

    /// Never inserts, so a cascaded record stays gone.
    fn replace(&mut self, record: &T) -> bool {
        match self.rows.get_mut(&record.record_id()) {
            Some(row) => {
                row.record = record.clone();
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, id: &T::Id) -> bool {
        self.rows.remove(id).is_some()
    }

    fn remove_owned_by(&mut self, owner: AccountId) -> usize {
        let before = self.rows.len();
        self.rows.retain(|_, row| row.record.owner() != owner);
        before - self.rows.len()
    }

    fn count(&self, keep: impl Fn(&T) -> bool) -> u64 {
        self.rows.values().filter(|row| keep(&row.record)).count() as u64
    }
}

#[derive(Default)]
struct StoreState {
    accounts: HashMap<AccountId, Row<Account>>,
    next_account_seq: u64,
    notes: OwnedTable<Note>,
    orders: OwnedTable<Order>,
    posts: OwnedTable<Post>,
}

impl StoreState {
    fn has_account(&self, id: AccountId) -> bool {
        self.accounts.contains_key(&id)
    }

    fn username_taken(&self, username: &str, except: Option<AccountId>) -> bool {
        self.accounts.values().any(|row| {
            Some(row.record.id()) != except && row.record.username().as_ref() == username
        })
    }

    fn email_taken(&self, email: &str, except: Option<AccountId>) -> bool {
        let email = email.to_lowercase();
        self.accounts
            .values()
            .any(|row| Some(row.record.id()) != except && row.record.email().as_ref() == email)
    }
}

/// Thread-safe in-memory implementation of every persistence port.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use notekeeper::outbound::persistence::InMemoryStore;
///
/// let store = Arc::new(InMemoryStore::new());
/// # let _ = store;
/// ```
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, String> {
        self.state.lock().map_err(|_| POISONED.to_owned())
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut state = self.lock().map_err(AccountRepositoryError::query)?;
        if state.username_taken(account.username().as_ref(), None) {
            return Err(AccountRepositoryError::duplicate_username());
        }
        if state.email_taken(account.email().as_ref(), None) {
            return Err(AccountRepositoryError::duplicate_email());
        }
        let seq = state.next_account_seq;
        state.next_account_seq += 1;
        state.accounts.insert(
            account.id(),
            Row {
                seq,
                record: account.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let state = self.lock().map_err(AccountRepositoryError::query)?;
        Ok(state.accounts.get(id).map(|row| row.record.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let state = self.lock().map_err(AccountRepositoryError::query)?;
        Ok(state
            .accounts
            .values()
            .find(|row| row.record.username().as_ref() == username)
            .map(|row| row.record.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountRepositoryError> {
        let email = email.trim().to_lowercase();
        let state = self.lock().map_err(AccountRepositoryError::query)?;
        Ok(state
            .accounts
            .values()
            .find(|row| row.record.email().as_ref() == email)
            .map(|row| row.record.clone()))
    }

    async fn list_all(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        let state = self.lock().map_err(AccountRepositoryError::query)?;
        let mut rows: Vec<&Row<Account>> = state.accounts.values().collect();
        rows.sort_by(|a, b| {
            a.record
                .created_at()
                .cmp(&b.record.created_at())
                .then_with(|| a.seq.cmp(&b.seq))
        });
        Ok(rows.into_iter().map(|row| row.record.clone()).collect())
    }

    async fn count_all(&self) -> Result<u64, AccountRepositoryError> {
        let state = self.lock().map_err(AccountRepositoryError::query)?;
        Ok(state.accounts.len() as u64)
    }

    async fn update(&self, account: &Account) -> Result<bool, AccountRepositoryError> {
        let mut state = self.lock().map_err(AccountRepositoryError::query)?;
        if !state.accounts.contains_key(&account.id()) {
            return Ok(false);
        }
        if state.username_taken(account.username().as_ref(), Some(account.id())) {
            return Err(AccountRepositoryError::duplicate_username());
        }
        if state.email_taken(account.email().as_ref(), Some(account.id())) {
            return Err(AccountRepositoryError::duplicate_email());
        }
        if let Some(row) = state.accounts.get_mut(&account.id()) {
            row.record = account.clone();
        }
        Ok(true)
    }

    async fn delete(&self, id: &AccountId) -> Result<bool, AccountRepositoryError> {
        let mut state = self.lock().map_err(AccountRepositoryError::query)?;
        if state.accounts.remove(id).is_none() {
            return Ok(false);
        }
        let notes = state.notes.remove_owned_by(*id);
        let orders = state.orders.remove_owned_by(*id);
        let posts = state.posts.remove_owned_by(*id);
        debug!(account_id = %id, notes, orders, posts, "cascaded account deletion");
        Ok(true)
    }
}

#[async_trait]
impl NoteRepository for InMemoryStore {
    async fn insert(&self, note: &Note) -> Result<(), NoteRepositoryError> {
        let mut state = self.lock().map_err(NoteRepositoryError::query)?;
        if !state.has_account(note.owner_id()) {
            return Err(NoteRepositoryError::owner_missing());
        }
        state.notes.insert(note.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>, NoteRepositoryError> {
        let state = self.lock().map_err(NoteRepositoryError::query)?;
        Ok(state.notes.get(id))
    }

    async fn list_all(&self) -> Result<Vec<Note>, NoteRepositoryError> {
        let state = self.lock().map_err(NoteRepositoryError::query)?;
        Ok(state.notes.newest_first(|_| true))
    }

    async fn list_by_owner(&self, owner_id: &AccountId) -> Result<Vec<Note>, NoteRepositoryError> {
        let state = self.lock().map_err(NoteRepositoryError::query)?;
        Ok(state.notes.newest_first(|note| note.owner_id() == *owner_id))
    }

    async fn update(&self, note: &Note) -> Result<bool, NoteRepositoryError> {
        let mut state = self.lock().map_err(NoteRepositoryError::query)?;
        Ok(state.notes.replace(note))
    }

    async fn delete(&self, id: &NoteId) -> Result<bool, NoteRepositoryError> {
        let mut state = self.lock().map_err(NoteRepositoryError::query)?;
        Ok(state.notes.remove(id))
    }

    async fn count_all(&self) -> Result<u64, NoteRepositoryError> {
        let state = self.lock().map_err(NoteRepositoryError::query)?;
        Ok(state.notes.count(|_| true))
    }

    async fn count_by_owner(&self, owner_id: &AccountId) -> Result<u64, NoteRepositoryError> {
        let state = self.lock().map_err(NoteRepositoryError::query)?;
        Ok(state.notes.count(|note| note.owner_id() == *owner_id))
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        let mut state = self.lock().map_err(OrderRepositoryError::query)?;
        if !state.has_account(order.owner_id()) {
            return Err(OrderRepositoryError::owner_missing());
        }
        state.orders.insert(order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let state = self.lock().map_err(OrderRepositoryError::query)?;
        Ok(state.orders.get(id))
    }

    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        let state = self.lock().map_err(OrderRepositoryError::query)?;
        Ok(state.orders.newest_first(|_| true))
    }

    async fn list_by_owner(
        &self,
        owner_id: &AccountId,
    ) -> Result<Vec<Order>, OrderRepositoryError> {
        let state = self.lock().map_err(OrderRepositoryError::query)?;
        Ok(state.orders.newest_first(|order| order.owner_id() == *owner_id))
    }

    async fn update(&self, order: &Order) -> Result<bool, OrderRepositoryError> {
        let mut state = self.lock().map_err(OrderRepositoryError::query)?;
        Ok(state.orders.replace(order))
    }

    async fn delete(&self, id: &OrderId) -> Result<bool, OrderRepositoryError> {
        let mut state = self.lock().map_err(OrderRepositoryError::query)?;
        Ok(state.orders.remove(id))
    }

    async fn count_all(&self) -> Result<u64, OrderRepositoryError> {
        let state = self.lock().map_err(OrderRepositoryError::query)?;
        Ok(state.orders.count(|_| true))
    }

    async fn count_by_owner(&self, owner_id: &AccountId) -> Result<u64, OrderRepositoryError> {
        let state = self.lock().map_err(OrderRepositoryError::query)?;
        Ok(state.orders.count(|order| order.owner_id() == *owner_id))
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut state = self.lock().map_err(PostRepositoryError::query)?;
        if !state.has_account(post.author_id()) {
            return Err(PostRepositoryError::owner_missing());
        }
        state.posts.insert(post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        let state = self.lock().map_err(PostRepositoryError::query)?;
        Ok(state.posts.get(id))
    }

    async fn list_all(&self) -> Result<Vec<Post>, PostRepositoryError> {
        let state = self.lock().map_err(PostRepositoryError::query)?;
        Ok(state.posts.newest_first(|_| true))
    }

    async fn list_by_author(&self, author_id: &AccountId) -> Result<Vec<Post>, PostRepositoryError> {
        let state = self.lock().map_err(PostRepositoryError::query)?;
        Ok(state.posts.newest_first(|post| post.author_id() == *author_id))
    }

    async fn update(&self, post: &Post) -> Result<bool, PostRepositoryError> {
        let mut state = self.lock().map_err(PostRepositoryError::query)?;
        Ok(state.posts.replace(post))
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostRepositoryError> {
        let mut state = self.lock().map_err(PostRepositoryError::query)?;
        Ok(state.posts.remove(id))
    }

    async fn count_all(&self) -> Result<u64, PostRepositoryError> {
        let state = self.lock().map_err(PostRepositoryError::query)?;
        Ok(state.posts.count(|_| true))
    }
}
