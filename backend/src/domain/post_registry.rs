//! Post registry: author-tagged blog posts over the store.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;

use super::ports::PostRepository;
use super::{AccessError, AccountId, Post, PostDraft, PostId};

/// Registry of posts backed by a [`PostRepository`].
#[derive(Clone)]
pub struct PostRegistry {
    repository: Arc<dyn PostRepository>,
    clock: Arc<dyn Clock>,
}

impl PostRegistry {
    /// Build a registry over `repository`, stamping posts with `clock`.
    pub fn new(repository: Arc<dyn PostRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Validate `draft` and publish it under `author_id`.
    pub async fn create(&self, author_id: AccountId, draft: &PostDraft) -> Result<Post, AccessError> {
        let contents = draft.validate()?;
        let post = Post::new(PostId::random(), author_id, contents, self.clock.utc());
        self.repository.insert(&post).await?;
        debug!(post_id = %post.id(), author_id = %author_id, "post published");
        Ok(post)
    }

    /// Fetch a post by identifier.
    pub async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, AccessError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// All posts, newest first.
    pub async fn list_all(&self) -> Result<Vec<Post>, AccessError> {
        Ok(self.repository.list_all().await?)
    }

    /// Posts written by `author_id`, newest first.
    pub async fn list_by_author(&self, author_id: &AccountId) -> Result<Vec<Post>, AccessError> {
        Ok(self.repository.list_by_author(author_id).await?)
    }

    /// Add one like and persist the new count.
    pub async fn like(&self, post: &Post) -> Result<Post, AccessError> {
        let mut liked = post.clone();
        liked.like();
        if !self.repository.update(&liked).await? {
            return Err(AccessError::not_found("post"));
        }
        Ok(liked)
    }

    /// Remove a post; `NotFound` when it was already gone.
    pub async fn delete(&self, post: &Post) -> Result<(), AccessError> {
        if !self.repository.delete(&post.id()).await? {
            return Err(AccessError::not_found("post"));
        }
        debug!(post_id = %post.id(), "post deleted");
        Ok(())
    }

    /// Number of stored posts.
    pub async fn count_all(&self) -> Result<u64, AccessError> {
        Ok(self.repository.count_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::domain::ports::{MockPostRepository, PostRepositoryError};
    use crate::outbound::persistence::InMemoryStore;
    use crate::test_support::{MutableClock, fixture_timestamp, stored_account};
    use rstest::{fixture, rstest};

    struct Setup {
        store: Arc<InMemoryStore>,
        registry: PostRegistry,
        clock: Arc<MutableClock>,
    }

    #[fixture]
    fn setup() -> Setup {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(MutableClock::new(fixture_timestamp()));
        Setup {
            registry: PostRegistry::new(store.clone(), clock.clone()),
            store,
            clock,
        }
    }

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.into(),
            content: "body".into(),
            tags: vec!["news".into()],
        }
    }

    #[rstest]
    #[tokio::test]
    async fn listings_are_newest_first_and_scoped_by_author(setup: Setup) {
        let ann = stored_account(&setup.store, "ann", Role::Standard).await;
        let ben = stored_account(&setup.store, "ben", Role::Standard).await;
        for (author, title) in [(ann, "first"), (ben, "second"), (ann, "third")] {
            setup
                .registry
                .create(author, &draft(title))
                .await
                .expect("create");
            setup.clock.advance_seconds(60);
        }

        let titles = |posts: Vec<Post>| -> Vec<String> {
            posts.iter().map(|p| p.title().to_owned()).collect()
        };
        assert_eq!(
            titles(setup.registry.list_all().await.expect("list")),
            ["third", "second", "first"]
        );
        assert_eq!(
            titles(setup.registry.list_by_author(&ann).await.expect("list")),
            ["third", "first"]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn likes_accumulate(setup: Setup) {
        let ann = stored_account(&setup.store, "ann", Role::Standard).await;
        let post = setup.registry.create(ann, &draft("liked")).await.expect("create");
        let once = setup.registry.like(&post).await.expect("like");
        let twice = setup.registry.like(&once).await.expect("like");
        assert_eq!(twice.likes(), 2);
        let stored = setup.registry.find_by_id(&post.id()).await.expect("lookup");
        assert_eq!(stored.map(|p| p.likes()), Some(2));
    }

    #[rstest]
    #[tokio::test]
    async fn liking_a_deleted_post_is_not_found(setup: Setup) {
        let ann = stored_account(&setup.store, "ann", Role::Standard).await;
        let post = setup.registry.create(ann, &draft("gone")).await.expect("create");
        setup.registry.delete(&post).await.expect("delete");
        assert_eq!(
            setup.registry.like(&post).await,
            Err(AccessError::not_found("post"))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_authors_cannot_publish(setup: Setup) {
        let err = setup
            .registry
            .create(AccountId::random(), &draft("orphan"))
            .await
            .expect_err("no author");
        assert_eq!(err, AccessError::not_found("account"));
        assert_eq!(setup.registry.count_all().await, Ok(0));
    }

    #[rstest]
    #[tokio::test]
    async fn store_outages_surface_as_unavailable() {
        let mut repository = MockPostRepository::new();
        repository
            .expect_count_all()
            .returning(|| Err(PostRepositoryError::connection("refused")));
        let registry = PostRegistry::new(
            Arc::new(repository),
            Arc::new(MutableClock::new(fixture_timestamp())),
        );
        let err = registry.count_all().await.expect_err("outage");
        assert!(matches!(err, AccessError::Unavailable { .. }));
    }
}
