use async_trait::async_trait;

use crate::domain::{Comment, Follow, Group, Id, Post, PostFilter, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (insert when unsaved, update otherwise).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, cascading per the schema rules.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Id> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_ids(&self, ids: &[Id]) -> Result<Vec<User>, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, Id> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    async fn find_by_ids(&self, ids: &[Id]) -> Result<Vec<Group>, RepoError>;

    /// Every group, ordered by title.
    async fn list(&self) -> Result<Vec<Group>, RepoError>;
}

/// Post repository. Listings are newest first.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Id> {
    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError>;

    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Id> {
    /// Comments of a post in creation order.
    async fn find_by_post(&self, post_id: Id) -> Result<Vec<Comment>, RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;
}

/// Follow repository.
#[async_trait]
pub trait FollowRepository: BaseRepository<Follow, Id> {
    async fn exists(&self, user_id: Id, author_id: Id) -> Result<bool, RepoError>;

    /// Remove the follow of `user_id` on `author_id`, returning whether one existed.
    async fn delete_pair(&self, user_id: Id, author_id: Id) -> Result<bool, RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;
}
