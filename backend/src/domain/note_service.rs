//! Note use-cases guarded by ownership.
//!
//! Every single-note operation loads the note first (`NotFound`) and then
//! applies the policy (`AuthorizationDenied`).

use tracing::warn;

use super::access_policy::{Operation, authorize};
use super::{AccessError, Caller, Note, NoteDraft, NoteId, NotePatch, NoteRegistry};

/// Note use-cases for one authenticated caller at a time.
#[derive(Clone)]
pub struct NoteService {
    notes: NoteRegistry,
}

impl NoteService {
    /// Wrap the note registry.
    pub fn new(notes: NoteRegistry) -> Self {
        Self { notes }
    }

    /// Administrators see every note; everyone else sees their own.
    pub async fn list_visible(&self, caller: &Caller) -> Result<Vec<Note>, AccessError> {
        if caller.is_admin() {
            self.notes.list_all().await
        } else {
            self.notes.list_by_owner(&caller.id()).await
        }
    }

    /// Read one note.
    pub async fn get(&self, caller: &Caller, id: &NoteId) -> Result<Note, AccessError> {
        self.guarded(caller, id, Operation::Read).await
    }

    /// The caller always becomes the owner.
    pub async fn create(&self, caller: &Caller, draft: &NoteDraft) -> Result<Note, AccessError> {
        authorize(caller, caller.id(), Operation::Create)?;
        self.notes.create(caller.id(), draft).await
    }

    /// Apply `patch` to a note the caller may change.
    pub async fn update(
        &self,
        caller: &Caller,
        id: &NoteId,
        patch: &NotePatch,
    ) -> Result<Note, AccessError> {
        let note = self.guarded(caller, id, Operation::Update).await?;
        self.notes.update(&note, patch).await
    }

    /// Remove a note the caller may change.
    pub async fn delete(&self, caller: &Caller, id: &NoteId) -> Result<(), AccessError> {
        let note = self.guarded(caller, id, Operation::Delete).await?;
        self.notes.delete(&note).await
    }

    async fn guarded(
        &self,
        caller: &Caller,
        id: &NoteId,
        operation: Operation,
    ) -> Result<Note, AccessError> {
        let note = self
            .notes
            .find_by_id(id)
            .await?
            .ok_or(AccessError::not_found("note"))?;
        if let Err(err) = authorize(caller, note.owner_id(), operation) {
            warn!(account_id = %caller.id(), note_id = %id, ?operation, "note access denied");
            return Err(err);
        }
        Ok(note)
    }
}
