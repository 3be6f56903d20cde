//! In-memory repositories - used in tests and when no database is configured.
//!
//! Note: Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Author, Post};
use quill_core::error::RepoError;
use quill_core::ports::{AuthorRepository, BaseRepository, PostRepository};

fn take(limit: Option<u64>) -> usize {
    limit
        .and_then(|l| usize::try_from(l).ok())
        .unwrap_or(usize::MAX)
}

/// Author store backed by a `HashMap`.
///
/// Mirrors the unique index on `user_name` that the SQL schema carries.
#[derive(Default)]
pub struct InMemoryAuthorRepository {
    store: RwLock<HashMap<Uuid, Author>>,
}

impl InMemoryAuthorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn user_name_taken(store: &HashMap<Uuid, Author>, author: &Author) -> bool {
        store
            .values()
            .any(|a| a.user_name == author.user_name && a.id != author.id)
    }
}

#[async_trait]
impl BaseRepository<Author, Uuid> for InMemoryAuthorRepository {
    async fn find_all(&self, limit: Option<u64>) -> Result<Vec<Author>, RepoError> {
        let store = self.store.read().await;
        let mut authors: Vec<Author> = store.values().cloned().collect();
        authors.sort_by(|a, b| a.user_name.cmp(&b.user_name));
        authors.truncate(take(limit));
        Ok(authors)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, author: Author) -> Result<Author, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&author.id) {
            return Err(RepoError::Constraint(format!("duplicate id {}", author.id)));
        }
        if Self::user_name_taken(&store, &author) {
            return Err(RepoError::Constraint(format!(
                "duplicate user_name {}",
                author.user_name
            )));
        }
        store.insert(author.id, author.clone());
        Ok(author)
    }

    async fn update(&self, author: Author) -> Result<Author, RepoError> {
        let mut store = self.store.write().await;
        if !store.contains_key(&author.id) {
            return Err(RepoError::NotFound);
        }
        if Self::user_name_taken(&store, &author) {
            return Err(RepoError::Constraint(format!(
                "duplicate user_name {}",
                author.user_name
            )));
        }
        store.insert(author.id, author.clone());
        Ok(author)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<Author>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|a| a.user_name == user_name).cloned())
    }
}

/// Post store backed by a `Vec` in insertion order.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest first; later insertions win ties on `created`.
    fn newest_first<'a>(posts: impl DoubleEndedIterator<Item = &'a Post>) -> Vec<Post> {
        let mut posts: Vec<Post> = posts.rev().cloned().collect();
        posts.sort_by(|a, b| b.created.cmp(&a.created));
        posts
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_all(&self, limit: Option<u64>) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut posts = Self::newest_first(store.iter());
        posts.truncate(take(limit));
        Ok(posts)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint(format!("duplicate id {}", post.id)));
        }
        store.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        let slot = store
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|p| p.id != id);
        if store.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(Self::newest_first(
            store.iter().filter(|p| p.author_id == author_id),
        ))
    }

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|p| p.author_id != author_id);
        Ok((before - store.len()) as u64)
    }
}
