//! Note registry: owner-tagged note records over the store.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;

use super::ports::NoteRepository;
use super::{AccessError, AccountId, Note, NoteDraft, NoteId, NotePatch};

/// Registry of notes backed by a [`NoteRepository`].
#[derive(Clone)]
pub struct NoteRegistry {
    repository: Arc<dyn NoteRepository>,
    clock: Arc<dyn Clock>,
}

impl NoteRegistry {
    /// Build a registry over `repository`, stamping records with `clock`.
    pub fn new(repository: Arc<dyn NoteRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Validate `draft` and store it as a note owned by `owner_id`.
    pub async fn create(&self, owner_id: AccountId, draft: &NoteDraft) -> Result<Note, AccessError> {
        let (title, content) = draft.validate()?;
        let note = Note::new(NoteId::random(), owner_id, title, content, self.clock.utc());
        self.repository.insert(&note).await?;
        debug!(note_id = %note.id(), owner_id = %owner_id, "note created");
        Ok(note)
    }

    /// Fetch a note by identifier.
    pub async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>, AccessError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// All notes, newest first.
    pub async fn list_all(&self) -> Result<Vec<Note>, AccessError> {
        Ok(self.repository.list_all().await?)
    }

    /// Notes owned by `owner_id`, newest first.
    pub async fn list_by_owner(&self, owner_id: &AccountId) -> Result<Vec<Note>, AccessError> {
        Ok(self.repository.list_by_owner(owner_id).await?)
    }

    /// Re-validate supplied fields and bump `updated_at`.
    ///
    /// A patch with no fields is a successful no-op.
    pub async fn update(&self, note: &Note, patch: &NotePatch) -> Result<Note, AccessError> {
        if patch.is_empty() {
            return Ok(note.clone());
        }
        let (title, content) = patch.validate()?;
        let mut updated = note.clone();
        updated.revise(title, content, self.clock.utc());
        if !self.repository.update(&updated).await? {
            return Err(AccessError::not_found("note"));
        }
        debug!(note_id = %updated.id(), "note updated");
        Ok(updated)
    }

    /// Remove a note; `NotFound` when it was already gone.
    pub async fn delete(&self, note: &Note) -> Result<(), AccessError> {
        if !self.repository.delete(&note.id()).await? {
            return Err(AccessError::not_found("note"));
        }
        debug!(note_id = %note.id(), "note deleted");
        Ok(())
    }

    /// Number of stored notes.
    pub async fn count_all(&self) -> Result<u64, AccessError> {
        Ok(self.repository.count_all().await?)
    }

    /// Number of notes owned by `owner_id`.
    pub async fn count_by_owner(&self, owner_id: &AccountId) -> Result<u64, AccessError> {
        Ok(self.repository.count_by_owner(owner_id).await?)
    }
}
