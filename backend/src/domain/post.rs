//! Blog posts authored by a single account.
//!
//! A post is written once and then only collects likes; its author is the
//! owner for access decisions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::note::{BoundError, bounded_text};
use super::{AccessError, AccountId};

/// Maximum post title length, in characters.
pub const POST_TITLE_MAX: usize = 200;
/// Maximum post body length, in characters.
pub const POST_CONTENT_MAX: usize = 20_000;
/// Maximum number of distinct tags on one post.
pub const POST_TAGS_MAX: usize = 10;
/// Maximum tag length, in characters.
pub const POST_TAG_MAX: usize = 30;

/// Validation errors raised for post fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    InvalidId,
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyContent,
    ContentTooLong { max: usize },
    EmptyTag,
    TagTooLong { max: usize },
    TooManyTags { max: usize },
}

impl PostValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyContent | Self::ContentTooLong { .. } => "content",
            Self::EmptyTag | Self::TagTooLong { .. } | Self::TooManyTags { .. } => "tags",
        }
    }
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "post id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyContent => write!(f, "content must not be empty"),
            Self::ContentTooLong { max } => write!(f, "content must be at most {max} characters"),
            Self::EmptyTag => write!(f, "tags must not be blank"),
            Self::TagTooLong { max } => write!(f, "each tag must be at most {max} characters"),
            Self::TooManyTags { max } => write!(f, "at most {max} distinct tags are allowed"),
        }
    }
}

impl std::error::Error for PostValidationError {}

impl From<PostValidationError> for AccessError {
    fn from(value: PostValidationError) -> Self {
        AccessError::validation(value.field(), value)
    }
}

/// Stable post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Generate a new random [`PostId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PostId {
    type Err = PostValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| PostValidationError::InvalidId)
    }
}

/// Raw fields for a new post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Checked contents of a [`PostDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContents {
    title: String,
    content: String,
    tags: Vec<String>,
}

impl PostDraft {
    /// Validate every field.
    ///
    /// Tags are trimmed and lowercased; repeats collapse onto the first
    /// occurrence before the tag limit is applied.
    ///
    /// # Examples
    /// ```
    /// use notekeeper::domain::PostDraft;
    ///
    /// let draft = PostDraft {
    ///     title: "Hello".into(),
    ///     content: "First post".into(),
    ///     tags: vec![" Rust ".into(), "rust".into(), "Web".into()],
    /// };
    /// assert!(draft.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<PostContents, PostValidationError> {
        let title = bounded_text(&self.title, POST_TITLE_MAX).map_err(|err| match err {
            BoundError::Empty => PostValidationError::EmptyTitle,
            BoundError::TooLong => PostValidationError::TitleTooLong {
                max: POST_TITLE_MAX,
            },
        })?;
        let content = bounded_text(&self.content, POST_CONTENT_MAX).map_err(|err| match err {
            BoundError::Empty => PostValidationError::EmptyContent,
            BoundError::TooLong => PostValidationError::ContentTooLong {
                max: POST_CONTENT_MAX,
            },
        })?;

        let mut tags: Vec<String> = Vec::new();
        for raw in &self.tags {
            let tag = bounded_text(raw, POST_TAG_MAX)
                .map_err(|err| match err {
                    BoundError::Empty => PostValidationError::EmptyTag,
                    BoundError::TooLong => PostValidationError::TagTooLong { max: POST_TAG_MAX },
                })?
                .to_lowercase();
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        if tags.len() > POST_TAGS_MAX {
            return Err(PostValidationError::TooManyTags { max: POST_TAGS_MAX });
        }

        Ok(PostContents {
            title,
            content,
            tags,
        })
    }
}

/// Blog post owned by its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: PostId,
    author_id: AccountId,
    title: String,
    content: String,
    tags: Vec<String>,
    likes: u64,
    created_at: DateTime<Utc>,
}

impl Post {
    /// Publish checked contents with no likes yet.
    pub fn new(
        id: PostId,
        author_id: AccountId,
        contents: PostContents,
        created_at: DateTime<Utc>,
    ) -> Self {
        let PostContents {
            title,
            content,
            tags,
        } = contents;
        Self {
            id,
            author_id,
            title,
            content,
            tags,
            likes: 0,
            created_at,
        }
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    /// The author is the owner for access decisions.
    pub fn author_id(&self) -> AccountId {
        self.author_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn likes(&self) -> u64 {
        self.likes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Record one more like.
    pub fn like(&mut self) {
        self.likes = self.likes.saturating_add(1);
    }
}
