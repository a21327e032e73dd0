use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Follow, Group, Post, User};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};

/// Generic repository trait defining standard CRUD operations.
///
/// End users never delete entities through the web surface; `delete` exists
/// for administrative callers.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Persist changes to an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their unique username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Batch lookup for rendering author names on a page of posts.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, Uuid> {
    /// Find a group by its unique slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    /// All groups, for the post form's group picker.
    async fn list(&self) -> Result<Vec<Group>, RepoError>;
}

/// Post repository. Every paginated query is ordered newest-first by
/// creation timestamp and clamps out-of-range page numbers.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// The global feed.
    async fn page_recent(&self, request: PageRequest) -> Result<Page<Post>, RepoError>;

    /// Posts tagged with one group.
    async fn page_by_group(
        &self,
        group_id: Uuid,
        request: PageRequest,
    ) -> Result<Page<Post>, RepoError>;

    /// Posts by one author.
    async fn page_by_author(
        &self,
        author_id: Uuid,
        request: PageRequest,
    ) -> Result<Page<Post>, RepoError>;

    /// Posts by any of the given authors - the follow feed. An empty author
    /// list yields an empty page.
    async fn page_by_authors(
        &self,
        author_ids: &[Uuid],
        request: PageRequest,
    ) -> Result<Page<Post>, RepoError>;

    /// Number of posts an author has published.
    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments under a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

/// Follow repository. Both mutations are idempotent; callers learn whether
/// anything changed from the returned flag.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Create the (user, author) pair unless it already exists.
    /// Returns true if a new row was inserted.
    async fn follow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;

    /// Delete the (user, author) pair if present.
    /// Returns true if a row was removed.
    async fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;

    /// Whether `user_id` currently follows `author_id`.
    async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;

    /// Ids of every author `user_id` follows.
    async fn followed_author_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError>;

    /// The stored relationship row, if any.
    async fn find(&self, user_id: Uuid, author_id: Uuid) -> Result<Option<Follow>, RepoError>;
}
