use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Author, Post};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
///
/// Implementations only promise atomic single-record writes.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// List entities, optionally capped at `limit` records.
    async fn find_all(&self, limit: Option<u64>) -> Result<Vec<T>, RepoError>;

    /// Find an entity by its unique ID. Absence is `Ok(None)`, not an error.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Replace an existing entity. Fails with [`RepoError::NotFound`] if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Fails with [`RepoError::NotFound`] if nothing was removed.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Author repository with domain-specific methods.
#[async_trait]
pub trait AuthorRepository: BaseRepository<Author, Uuid> {
    /// Find an author by user name.
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<Author>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Delete every post owned by `author_id`, returning how many were removed.
    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, RepoError>;
}
