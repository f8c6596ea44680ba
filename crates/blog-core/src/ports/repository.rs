use async_trait::async_trait;

use crate::domain::{Author, NewUser, Post, PostFields, PostQuery, User};
use crate::error::RepoError;

/// Generic repository trait shared by every store.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Fails with [`RepoError::NotFound`] when absent.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    /// Store a new user, assigning its id and creation time.
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Store a new post written by `author`.
    async fn create(&self, author: Author, fields: PostFields) -> Result<Post, RepoError>;

    /// Replace title and content. Author and creation time are kept.
    async fn update(&self, id: i64, fields: PostFields) -> Result<Post, RepoError>;

    /// Posts matching `query`, ascending by id.
    async fn list(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError>;

    /// Number of posts matching `query`, ignoring its slice.
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError>;
}
