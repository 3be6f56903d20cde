//! Data Transfer Objects - request/response types for the API.
//!
//! Request fields are optional so that missing values are reported by domain
//! validation, naming each field, rather than by the JSON decoder. Fields not
//! declared here are dropped during deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create an author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
}

/// Partial author update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthorRequest {
    /// Optional echo of the path id; must match it when present.
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentRequest {
    pub content: Option<String>,
}

/// Request to create a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Id of an existing author.
    pub author: Option<String>,
    #[serde(default)]
    pub comments: Vec<CommentRequest>,
}

/// Partial post update. An `author` field, if sent, is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Query string for `GET /posts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<u64>,
}

/// An author's public representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    /// Display name, as used for `authorString` on posts.
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorListResponse {
    pub authors: Vec<AuthorResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub content: String,
}

/// A post's public representation, joined with its author's name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Id of the owning author.
    pub author: Uuid,
    /// `null` when the author can no longer be resolved.
    pub author_string: Option<String>,
    pub comments: Vec<CommentResponse>,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
}

/// Acknowledges a deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub deleted: Uuid,
    /// Posts removed along with an author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts_deleted: Option<u64>,
}
