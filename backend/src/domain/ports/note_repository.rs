//! Port for note persistence.

use async_trait::async_trait;

use crate::domain::{AccessError, AccountId, Note, NoteId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by note repository adapters.
    pub enum NoteRepositoryError {
        /// The owning account no longer exists.
        OwnerMissing => "note owner no longer exists",
        /// Repository connection could not be established.
        Connection { message: String } => "note repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "note repository query failed: {message}",
    }
}

impl From<NoteRepositoryError> for AccessError {
    fn from(value: NoteRepositoryError) -> Self {
        match value {
            NoteRepositoryError::OwnerMissing => AccessError::not_found("account"),
            NoteRepositoryError::Connection { message } => AccessError::unavailable(message),
            NoteRepositoryError::Query { message } => AccessError::internal(message),
        }
    }
}

/// Port for storing notes. Listings are newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a note whose owner still exists, in one step with that check.
    async fn insert(&self, note: &Note) -> Result<(), NoteRepositoryError>;

    /// Fetch a note by identifier.
    async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>, NoteRepositoryError>;

    /// Every stored note.
    async fn list_all(&self) -> Result<Vec<Note>, NoteRepositoryError>;

    /// Records owned by `owner_id`.
    async fn list_by_owner(&self, owner_id: &AccountId) -> Result<Vec<Note>, NoteRepositoryError>;

    /// Replace a stored note. Returns `false` when it no longer exists.
    async fn update(&self, note: &Note) -> Result<bool, NoteRepositoryError>;

    /// Returns `false` when the note was already gone.
    async fn delete(&self, id: &NoteId) -> Result<bool, NoteRepositoryError>;

    /// Number of stored records.
    async fn count_all(&self) -> Result<u64, NoteRepositoryError>;

    /// Number of records owned by `owner_id`.
    async fn count_by_owner(&self, owner_id: &AccountId) -> Result<u64, NoteRepositoryError>;
}
