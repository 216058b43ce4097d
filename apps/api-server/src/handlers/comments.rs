//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{Comment, User};
use quill_core::error::DomainError;
use quill_core::ports::{BaseRepository, CommentRepository};
use quill_shared::ApiResponse;
use quill_shared::dto::{CommentResponse, CreateCommentRequest, UpdateCommentRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn comment_response(comment: Comment, author: Option<&User>) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        content: comment.content,
        author_id: comment.author_id,
        post_id: comment.post_id,
        author: author.map(|u| u.username.clone()),
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

async fn require_post(state: &AppState, id: Uuid) -> AppResult<()> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound {
            entity_type: "blog post",
            id,
        })?;
    Ok(())
}

/// Load a comment and check it actually belongs to the post in the path.
/// A comment reached through the wrong post is treated as absent.
async fn load_comment(state: &AppState, post_id: Uuid, comment_id: Uuid) -> AppResult<Comment> {
    let comment = state
        .comments
        .find_by_id(comment_id)
        .await?
        .filter(|c| c.post_id == post_id)
        .ok_or(DomainError::NotFound {
            entity_type: "comment",
            id: comment_id,
        })?;
    Ok(comment)
}

/// POST /api/blogs/comments/{blog_id}
pub async fn create_comment(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let blog_id = path.into_inner();
    let req = body.into_inner();

    // The parent post must exist before a comment is accepted.
    require_post(&state, blog_id).await?;

    if req.content.trim().is_empty() {
        return Err(AppError::Validation(vec!["Content is required".to_string()]));
    }

    let comment = Comment::new(identity.user_id, blog_id, req.content);
    let saved = state.comments.insert(comment).await?;

    tracing::info!(comment_id = %saved.id, post_id = %blog_id, "Comment added");

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        comment_response(saved, None),
        "Comment added",
    )))
}

/// GET /api/blogs/comments/{blog_id} - public route
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments: Vec<CommentResponse> = state
        .comments
        .list_by_post_with_authors(path.into_inner())
        .await?
        .into_iter()
        .map(|(comment, author)| comment_response(comment, author.as_ref()))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(comments)))
}

/// PUT /api/blogs/comments/{blog_id}/{comment_id}
pub async fn update_comment(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateCommentRequest>,
) -> AppResult<HttpResponse> {
    let (blog_id, comment_id) = path.into_inner();
    let req = body.into_inner();

    require_post(&state, blog_id).await?;
    let mut comment = load_comment(&state, blog_id, comment_id).await?;

    if comment.author_id != identity.user_id {
        return Err(AppError::Forbidden);
    }

    comment.apply_update(req.content);
    let saved = state.comments.update(comment).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        comment_response(saved, None),
        "Comment updated successfully",
    )))
}

/// DELETE /api/blogs/comments/{blog_id}/{comment_id}
pub async fn delete_comment(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (blog_id, comment_id) = path.into_inner();

    require_post(&state, blog_id).await?;
    let comment = load_comment(&state, blog_id, comment_id).await?;

    if comment.author_id != identity.user_id {
        return Err(AppError::Forbidden);
    }

    state.comments.delete(comment.id).await?;

    tracing::info!(comment_id = %comment.id, "Comment deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::message("Comment deleted successfully")))
}
