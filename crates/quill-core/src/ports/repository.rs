use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, Tag, User};
use crate::error::RepoError;
use crate::search::SearchFilter;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    ///
    /// Returns `RepoError::NotFound` when nothing was deleted. Cascades are
    /// part of each repository's contract, see the entity traits below.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository.
///
/// Deleting a user also deletes the user's posts (with the post cascade)
/// and the user's comments.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository, including the ordered post/tag relation.
///
/// Deleting a post also deletes its comments and its tag links. Tags
/// themselves are never deleted.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Newest first, `limit` posts starting at `offset`.
    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;

    /// All posts matching the filter, newest first, unpaginated.
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Post>, RepoError>;

    /// Posts linked to the tag, newest first.
    async fn find_by_tag(&self, tag_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Posts with no tag links, newest first.
    async fn find_untagged(&self) -> Result<Vec<Post>, RepoError>;

    /// Tags linked to the post, in the order they were added.
    async fn tags_of(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError>;

    /// Append links to the given tags. Already linked tags are skipped.
    async fn add_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError>;

    /// Remove every tag link of the post.
    async fn clear_tags(&self, post_id: Uuid) -> Result<(), RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Atomically return the tag named `tag_name`, creating it if absent.
    ///
    /// Concurrent calls with the same new name yield the same record.
    async fn get_or_create(&self, tag_name: &str) -> Result<Tag, RepoError>;

    /// First tag (by name) whose slug equals `slug`.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    /// All tags ordered by name.
    async fn all(&self) -> Result<Vec<Tag>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on a post, oldest first.
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}
