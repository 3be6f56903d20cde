//! Cross-entity rules between authors and posts.
//!
//! Every other component deals with a single collection. This service is the
//! only place that:
//!
//! - checks a post's author exists before the post is inserted,
//! - joins posts with their author to derive `authorString`,
//! - cascades an author deletion to the author's posts.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::try_join_all;
use uuid::Uuid;

use crate::domain::{
    Author, AuthorChanges, AuthorDraft, Comment, Post, PostChanges, PostDraft, PostView,
    derive_display_name, validation,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{AuthorRepository, PostRepository};

const AUTHOR: &str = "Author";
const POST: &str = "Post";

/// Outcome of a cascading author deletion.
#[derive(Debug, Clone)]
pub struct AuthorDeletion {
    pub author: Author,
    pub posts_deleted: u64,
}

/// Author/post integrity and serialization service.
#[derive(Clone)]
pub struct BlogService {
    authors: Arc<dyn AuthorRepository>,
    posts: Arc<dyn PostRepository>,
}

impl BlogService {
    pub fn new(authors: Arc<dyn AuthorRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { authors, posts }
    }

    // --- Authors ---

    pub async fn list_authors(&self) -> Result<Vec<Author>, DomainError> {
        Ok(self.authors.find_all(None).await?)
    }

    pub async fn get_author(&self, id: Uuid) -> Result<Author, DomainError> {
        self.authors
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(AUTHOR, id))
    }

    pub async fn create_author(&self, draft: AuthorDraft) -> Result<Author, DomainError> {
        let author = draft.validate()?;
        self.ensure_user_name_free(&author.user_name, None).await?;

        let user_name = author.user_name.clone();
        let saved = self
            .authors
            .insert(author)
            .await
            .map_err(|e| duplicate_on_constraint(e, &user_name))?;

        tracing::info!(author_id = %saved.id, user_name = %saved.user_name, "Author created");
        Ok(saved)
    }

    pub async fn update_author(
        &self,
        id: Uuid,
        declared_id: Option<&str>,
        changes: AuthorChanges,
    ) -> Result<Author, DomainError> {
        validation::ensure_same_id(id, declared_id)?;
        let changes = changes.validate()?;

        let mut author = self.get_author(id).await?;
        if let Some(user_name) = &changes.user_name {
            self.ensure_user_name_free(user_name, Some(id)).await?;
        }
        author.apply(changes);

        let user_name = author.user_name.clone();
        let saved = self.authors.update(author).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found(AUTHOR, id),
            other => duplicate_on_constraint(other, &user_name),
        })?;

        tracing::info!(author_id = %id, "Author updated");
        Ok(saved)
    }

    /// Delete an author and every post that references it.
    ///
    /// The store has no multi-collection transactions, so this runs in two
    /// ordered steps: the author's posts are deleted first and the author
    /// record only afterwards. If deleting the posts fails the author is kept,
    /// so the posts still resolve and the delete can be retried. A crash
    /// between the two steps leaves an author without posts.
    pub async fn delete_author(&self, id: Uuid) -> Result<AuthorDeletion, DomainError> {
        let author = self.get_author(id).await?;

        let posts_deleted = self.posts.delete_by_author(id).await.map_err(|e| {
            tracing::error!(author_id = %id, error = %e, "Cascade to posts failed; author kept");
            DomainError::from(e)
        })?;

        self.authors
            .delete(id)
            .await
            .map_err(not_found_or_store(AUTHOR, id))?;

        tracing::info!(author_id = %id, posts_deleted, "Author deleted");
        Ok(AuthorDeletion {
            author,
            posts_deleted,
        })
    }

    /// `userName` must be unique. This is check-then-write and therefore racy;
    /// stores with a unique index report the loser as a constraint violation.
    async fn ensure_user_name_free(
        &self,
        user_name: &str,
        owner: Option<Uuid>,
    ) -> Result<(), DomainError> {
        match self.authors.find_by_user_name(user_name).await? {
            Some(existing) if Some(existing.id) != owner => Err(user_name_taken(user_name)),
            _ => Ok(()),
        }
    }

    // --- Posts ---

    pub async fn list_posts(&self, limit: Option<u64>) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.find_all(limit).await?;
        self.present_all(posts).await
    }

    pub async fn list_posts_by_author(&self, author_id: Uuid) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.find_by_author(author_id).await?;
        self.present_all(posts).await
    }

    pub async fn get_post(&self, id: Uuid) -> Result<PostView, DomainError> {
        let post = self.find_post(id).await?;
        self.present(post).await
    }

    pub async fn create_post(&self, draft: PostDraft) -> Result<PostView, DomainError> {
        let post = draft.validate()?;

        let author = self
            .authors
            .find_by_id(post.author_id)
            .await?
            .ok_or(DomainError::UnknownReference {
                entity_type: AUTHOR,
                id: post.author_id,
            })?;

        let saved = self.posts.insert(post).await?;
        tracing::info!(post_id = %saved.id, author_id = %author.id, "Post created");

        Ok(PostView {
            author_string: Some(derive_display_name(&author)),
            post: saved,
        })
    }

    pub async fn update_post(
        &self,
        id: Uuid,
        declared_id: Option<&str>,
        changes: PostChanges,
    ) -> Result<PostView, DomainError> {
        validation::ensure_same_id(id, declared_id)?;
        let changes = changes.validate()?;

        let mut post = self.find_post(id).await?;
        post.apply(changes);

        let saved = self
            .posts
            .update(post)
            .await
            .map_err(not_found_or_store(POST, id))?;

        tracing::info!(post_id = %id, "Post updated");
        self.present(saved).await
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        self.posts
            .delete(id)
            .await
            .map_err(not_found_or_store(POST, id))?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Append a comment. Read-modify-write on one post; concurrent appends can
    /// overwrite each other.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        content: Option<String>,
    ) -> Result<PostView, DomainError> {
        let comment = Comment::from_draft(content)?;
        let mut post = self.find_post(post_id).await?;
        post.comments.push(comment);

        let saved = self
            .posts
            .update(post)
            .await
            .map_err(not_found_or_store(POST, post_id))?;
        self.present(saved).await
    }

    async fn find_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(POST, id))
    }

    // --- Serialization ---

    /// Join a post with its author. A dangling reference is logged and leaves
    /// `author_string` empty instead of failing the read.
    pub async fn present(&self, post: Post) -> Result<PostView, DomainError> {
        let author = self.authors.find_by_id(post.author_id).await?;
        let author_string = author.as_ref().map(derive_display_name);
        if author_string.is_none() {
            warn_dangling(&post);
        }
        Ok(PostView {
            post,
            author_string,
        })
    }

    /// Same as [`present`](Self::present), resolving each distinct author once.
    async fn present_all(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        let author_ids: HashSet<Uuid> = posts.iter().map(|p| p.author_id).collect();
        let lookups = author_ids.into_iter().map(|id| async move {
            self.authors
                .find_by_id(id)
                .await
                .map(|author| (id, author))
        });

        let names: HashMap<Uuid, String> = try_join_all(lookups)
            .await?
            .into_iter()
            .filter_map(|(id, author)| author.map(|a| (id, derive_display_name(&a))))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let author_string = names.get(&post.author_id).cloned();
                if author_string.is_none() {
                    warn_dangling(&post);
                }
                PostView {
                    post,
                    author_string,
                }
            })
            .collect())
    }
}

fn warn_dangling(post: &Post) {
    tracing::warn!(
        post_id = %post.id,
        author_id = %post.author_id,
        "Post references an author that no longer exists"
    );
}

fn user_name_taken(user_name: &str) -> DomainError {
    DomainError::Duplicate(format!("Username `{user_name}` is already taken"))
}

fn duplicate_on_constraint(err: RepoError, user_name: &str) -> DomainError {
    match err {
        RepoError::Constraint(_) => user_name_taken(user_name),
        other => other.into(),
    }
}

fn not_found_or_store(entity_type: &'static str, id: Uuid) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found(entity_type, id),
        other => other.into(),
    }
}
