//! Blog post use-cases guarded by authorship.
//!
//! Same ordering as notes and orders: the post is loaded first (`NotFound`),
//! then the policy decides (`AuthorizationDenied`).

use tracing::warn;

use super::access_policy::{Operation, authorize};
use super::{AccessError, Caller, Post, PostDraft, PostId, PostRegistry};

/// Post use-cases for one authenticated caller at a time.
#[derive(Clone)]
pub struct PostService {
    posts: PostRegistry,
}

impl PostService {
    /// Wrap the post registry.
    pub fn new(posts: PostRegistry) -> Self {
        Self { posts }
    }

    /// Administrators see every post; authors see their own.
    pub async fn list_visible(&self, caller: &Caller) -> Result<Vec<Post>, AccessError> {
        if caller.is_admin() {
            self.posts.list_all().await
        } else {
            self.posts.list_by_author(&caller.id()).await
        }
    }

    /// Read one post.
    pub async fn get(&self, caller: &Caller, id: &PostId) -> Result<Post, AccessError> {
        self.guarded(caller, id, Operation::Read).await
    }

    /// Publish a post authored by the caller.
    pub async fn create(&self, caller: &Caller, draft: &PostDraft) -> Result<Post, AccessError> {
        authorize(caller, caller.id(), Operation::Create)?;
        self.posts.create(caller.id(), draft).await
    }

    /// Like a post the caller is allowed to read.
    pub async fn like(&self, caller: &Caller, id: &PostId) -> Result<Post, AccessError> {
        let post = self.guarded(caller, id, Operation::Read).await?;
        self.posts.like(&post).await
    }

    /// Remove a post.
    pub async fn delete(&self, caller: &Caller, id: &PostId) -> Result<(), AccessError> {
        let post = self.guarded(caller, id, Operation::Delete).await?;
        self.posts.delete(&post).await
    }

    async fn guarded(
        &self,
        caller: &Caller,
        id: &PostId,
        operation: Operation,
    ) -> Result<Post, AccessError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(AccessError::not_found("post"))?;
        if let Err(err) = authorize(caller, post.author_id(), operation) {
            warn!(account_id = %caller.id(), post_id = %id, ?operation, "post access denied");
            return Err(err);
        }
        Ok(post)
    }
}
