//! Port for blog post persistence.

use async_trait::async_trait;

use crate::domain::{AccessError, AccountId, Post, PostId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// The authoring account no longer exists.
        OwnerMissing => "post author no longer exists",
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

impl From<PostRepositoryError> for AccessError {
    fn from(value: PostRepositoryError) -> Self {
        match value {
            PostRepositoryError::OwnerMissing => AccessError::not_found("account"),
            PostRepositoryError::Connection { message } => AccessError::unavailable(message),
            PostRepositoryError::Query { message } => AccessError::internal(message),
        }
    }
}

/// Port for storing posts. Listings are newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post whose author still exists, in one step with that check.
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError>;

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError>;

    async fn list_all(&self) -> Result<Vec<Post>, PostRepositoryError>;

    async fn list_by_author(&self, author_id: &AccountId) -> Result<Vec<Post>, PostRepositoryError>;

    /// Replace a stored post. Returns `false` when it no longer exists.
    async fn update(&self, post: &Post) -> Result<bool, PostRepositoryError>;

    /// Returns `false` when the post was already gone.
    async fn delete(&self, id: &PostId) -> Result<bool, PostRepositoryError>;

    async fn count_all(&self) -> Result<u64, PostRepositoryError>;
}
