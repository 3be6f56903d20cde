use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation;
use crate::error::DomainError;

/// A free-text comment embedded in a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
}

impl Comment {
    pub fn new(content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
        }
    }

    /// Validate raw comment text.
    pub fn from_draft(content: Option<String>) -> Result<Self, DomainError> {
        validation::require(&[("content", content.as_deref())])?;
        Ok(Self::new(content.unwrap_or_default()))
    }
}

/// Post entity - a blog post written by exactly one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Id of the owning [`Author`](super::Author).
    pub author_id: Uuid,
    pub comments: Vec<Comment>,
    pub created: DateTime<Utc>,
}

impl Post {
    /// Create a new post stamped with the current time.
    pub fn new(title: String, content: String, author_id: Uuid, comments: Vec<Comment>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            author_id,
            comments,
            created: Utc::now(),
        }
    }

    /// Copy the allow-listed fields of `changes` onto this post.
    ///
    /// `id`, `author_id`, `comments` and `created` are never touched here.
    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
    }
}

/// Unvalidated post creation input.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Raw author id as submitted.
    pub author: Option<String>,
    pub comments: Vec<Option<String>>,
}

impl PostDraft {
    /// Check required fields and build the post to insert.
    ///
    /// Whether the author actually exists is checked by the caller against the
    /// author store; this only checks shape.
    pub fn validate(self) -> Result<Post, DomainError> {
        let missing = validation::missing_fields(&[
            ("title", self.title.as_deref()),
            ("content", self.content.as_deref()),
            ("author", self.author.as_deref()),
        ]);

        let (title, content, author) = match (self.title, self.content, self.author) {
            (Some(title), Some(content), Some(author)) if missing.is_empty() => {
                (title, content, author)
            }
            _ => return Err(DomainError::MissingFields(missing)),
        };

        let author_id = validation::parse_id("author", &author)?;
        let comments = self
            .comments
            .into_iter()
            .map(Comment::from_draft)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Post::new(title, content, author_id, comments))
    }
}

/// Partial post update. Title and content are the only updatable fields;
/// reassigning a post to another author is not supported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostChanges {
    pub fn validate(self) -> Result<Self, DomainError> {
        let changes = Self {
            title: validation::non_blank("title", self.title)?,
            content: validation::non_blank("content", self.content)?,
        };
        if changes.title.is_none() && changes.content.is_none() {
            return Err(DomainError::Validation(
                "Missing `title` or `content` in request body".to_string(),
            ));
        }
        Ok(changes)
    }
}

/// A post joined with its author's display name, ready to serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub post: Post,
    /// `None` when the author reference no longer resolves.
    pub author_string: Option<String>,
}
