//! Note records owned by a single account.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{AccessError, AccountId};

/// Maximum note title length, in characters.
pub const NOTE_TITLE_MAX: usize = 200;
/// Maximum note body length, in characters.
pub const NOTE_CONTENT_MAX: usize = 10_000;

/// Validation errors raised for note fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    InvalidId,
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyContent,
    ContentTooLong { max: usize },
}

impl NoteValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyContent | Self::ContentTooLong { .. } => "content",
        }
    }
}

impl fmt::Display for NoteValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "note id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyContent => write!(f, "content must not be empty"),
            Self::ContentTooLong { max } => write!(f, "content must be at most {max} characters"),
        }
    }
}

impl std::error::Error for NoteValidationError {}

impl From<NoteValidationError> for AccessError {
    fn from(value: NoteValidationError) -> Self {
        AccessError::validation(value.field(), value)
    }
}

/// Stable note identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Generate a new random [`NoteId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for NoteId {
    type Err = NoteValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| NoteValidationError::InvalidId)
    }
}

/// Trim `raw` and check it is non-empty and at most `max` characters.
pub(crate) fn bounded_text(raw: &str, max: usize) -> Result<String, BoundError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BoundError::Empty);
    }
    if trimmed.chars().count() > max {
        return Err(BoundError::TooLong);
    }
    Ok(trimmed.to_owned())
}

/// Shared outcome of trimmed, bounded text checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoundError {
    Empty,
    TooLong,
}

/// Trimmed, non-empty note title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NoteTitle(String);

impl NoteTitle {
    pub fn new(raw: &str) -> Result<Self, NoteValidationError> {
        bounded_text(raw, NOTE_TITLE_MAX)
            .map(Self)
            .map_err(|err| match err {
                BoundError::Empty => NoteValidationError::EmptyTitle,
                BoundError::TooLong => NoteValidationError::TitleTooLong {
                    max: NOTE_TITLE_MAX,
                },
            })
    }
}

impl AsRef<str> for NoteTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Trimmed, non-empty note body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NoteContent(String);

impl NoteContent {
    pub fn new(raw: &str) -> Result<Self, NoteValidationError> {
        bounded_text(raw, NOTE_CONTENT_MAX)
            .map(Self)
            .map_err(|err| match err {
                BoundError::Empty => NoteValidationError::EmptyContent,
                BoundError::TooLong => NoteValidationError::ContentTooLong {
                    max: NOTE_CONTENT_MAX,
                },
            })
    }
}

impl AsRef<str> for NoteContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Raw fields for a new note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Validate every field; nothing is truncated.
    pub fn validate(&self) -> Result<(NoteTitle, NoteContent), NoteValidationError> {
        Ok((NoteTitle::new(&self.title)?, NoteContent::new(&self.content)?))
    }
}

/// Partial update for a note. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NotePatch {
    /// Whether the patch supplies no fields.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// Validate only the supplied fields.
    pub fn validate(
        &self,
    ) -> Result<(Option<NoteTitle>, Option<NoteContent>), NoteValidationError> {
        let title = self.title.as_deref().map(NoteTitle::new).transpose()?;
        let content = self.content.as_deref().map(NoteContent::new).transpose()?;
        Ok((title, content))
    }
}

/// Note owned by exactly one account.
///
/// Serialised with camelCase keys for the HTTP adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    id: NoteId,
    owner_id: AccountId,
    title: NoteTitle,
    content: NoteContent,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Note {
    /// Create a fresh note; `updated_at` starts equal to `created_at`.
    pub fn new(
        id: NoteId,
        owner_id: AccountId,
        title: NoteTitle,
        content: NoteContent,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            title,
            content,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn owner_id(&self) -> AccountId {
        self.owner_id
    }

    pub fn title(&self) -> &NoteTitle {
        &self.title
    }

    pub fn content(&self) -> &NoteContent {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace supplied fields and bump `updated_at`.
    pub fn revise(
        &mut self,
        title: Option<NoteTitle>,
        content: Option<NoteContent>,
        now: DateTime<Utc>,
    ) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        self.updated_at = now;
    }
}
