//! Post handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::{PostChanges, PostDraft, PostView};
use quill_shared::dto::{
    CommentRequest, CommentResponse, CreatePostRequest, DeletedResponse, ListPostsQuery,
    PostListResponse, PostResponse, UpdatePostRequest,
};

use super::path_id;
use crate::middleware::error::AppResult;
use crate::state::AppState;

const POST: &str = "Post";

pub(crate) fn post_response(view: PostView) -> PostResponse {
    let PostView {
        post,
        author_string,
    } = view;
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        author: post.author_id,
        author_string,
        comments: post
            .comments
            .into_iter()
            .map(|c| CommentResponse {
                id: c.id,
                content: c.content,
            })
            .collect(),
        created: post.created,
    }
}

pub(crate) fn post_list(views: Vec<PostView>) -> PostListResponse {
    PostListResponse {
        posts: views.into_iter().map(post_response).collect(),
    }
}

/// GET /posts?limit=N
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let views = state.blog.list_posts(query.limit).await?;
    Ok(HttpResponse::Ok().json(post_list(views)))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path_id(&path, POST)?;
    let view = state.blog.get_post(id).await?;
    Ok(HttpResponse::Ok().json(post_response(view)))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let draft = PostDraft {
        title: req.title,
        content: req.content,
        author: req.author,
        comments: req.comments.into_iter().map(|c| c.content).collect(),
    };

    let view = state.blog.create_post(draft).await?;
    Ok(HttpResponse::Created().json(post_response(view)))
}

/// PUT /posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path_id(&path, POST)?;
    let req = body.into_inner();
    let changes = PostChanges {
        title: req.title,
        content: req.content,
    };

    let view = state
        .blog
        .update_post(id, req.id.as_deref(), changes)
        .await?;
    Ok(HttpResponse::Ok().json(post_response(view)))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path_id(&path, POST)?;
    state.blog.delete_post(id).await?;
    Ok(HttpResponse::Ok().json(DeletedResponse {
        deleted: id,
        posts_deleted: None,
    }))
}

/// POST /posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let id = path_id(&path, POST)?;
    let view = state.blog.add_comment(id, body.into_inner().content).await?;
    Ok(HttpResponse::Created().json(post_response(view)))
}
