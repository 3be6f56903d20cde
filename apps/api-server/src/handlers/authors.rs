//! Author handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::{Author, AuthorChanges, AuthorDraft, derive_display_name};
use quill_shared::dto::{
    AuthorListResponse, AuthorResponse, CreateAuthorRequest, DeletedResponse, UpdateAuthorRequest,
};

use super::path_id;
use super::posts::post_list;
use crate::middleware::error::AppResult;
use crate::state::AppState;

const AUTHOR: &str = "Author";

fn author_response(author: Author) -> AuthorResponse {
    AuthorResponse {
        name: derive_display_name(&author),
        id: author.id,
        first_name: author.first_name,
        last_name: author.last_name,
        user_name: author.user_name,
    }
}

/// GET /authors
pub async fn list_authors(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let authors = state.blog.list_authors().await?;
    Ok(HttpResponse::Ok().json(AuthorListResponse {
        authors: authors.into_iter().map(author_response).collect(),
    }))
}

/// GET /authors/{id}
pub async fn get_author(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path_id(&path, AUTHOR)?;
    let author = state.blog.get_author(id).await?;
    Ok(HttpResponse::Ok().json(author_response(author)))
}

/// GET /authors/{id}/posts
pub async fn list_author_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path_id(&path, AUTHOR)?;
    // 404 for unknown authors rather than an empty list.
    state.blog.get_author(id).await?;
    let views = state.blog.list_posts_by_author(id).await?;
    Ok(HttpResponse::Ok().json(post_list(views)))
}

/// POST /authors
pub async fn create_author(
    state: web::Data<AppState>,
    body: web::Json<CreateAuthorRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let draft = AuthorDraft {
        first_name: req.first_name,
        last_name: req.last_name,
        user_name: req.user_name,
    };

    let author = state.blog.create_author(draft).await?;
    Ok(HttpResponse::Created().json(author_response(author)))
}

/// PUT /authors/{id}
pub async fn update_author(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateAuthorRequest>,
) -> AppResult<HttpResponse> {
    let id = path_id(&path, AUTHOR)?;
    let req = body.into_inner();
    let changes = AuthorChanges {
        first_name: req.first_name,
        last_name: req.last_name,
        user_name: req.user_name,
    };

    let author = state
        .blog
        .update_author(id, req.id.as_deref(), changes)
        .await?;
    Ok(HttpResponse::Ok().json(author_response(author)))
}

/// DELETE /authors/{id} - also deletes the author's posts.
pub async fn delete_author(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path_id(&path, AUTHOR)?;
    let deletion = state.blog.delete_author(id).await?;
    Ok(HttpResponse::Ok().json(DeletedResponse {
        deleted: deletion.author.id,
        posts_deleted: Some(deletion.posts_deleted),
    }))
}
