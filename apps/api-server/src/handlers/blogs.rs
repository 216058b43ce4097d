//! Blog post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{Post, User};
use quill_core::error::DomainError;
use quill_core::ports::{BaseRepository, PostRepository};
use quill_shared::ApiResponse;
use quill_shared::dto::{CreatePostRequest, PostResponse, UpdatePostRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_response(post: Post, author: Option<&User>) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        author_id: post.author_id,
        author: author.map(|u| u.username.clone()),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

async fn load_post(state: &AppState, id: Uuid) -> AppResult<Post> {
    Ok(state.posts.find_by_id(id).await?.ok_or(DomainError::NotFound {
        entity_type: "blog post",
        id,
    })?)
}

/// POST /api/blogs
pub async fn create_post(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut errors = Vec::new();
    if req.title.trim().is_empty() {
        errors.push("Title is required".to_string());
    }
    if req.content.trim().is_empty() {
        errors.push("Content is required".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let post = Post::new(identity.user_id, req.title, req.content);
    let saved = state.posts.insert(post).await?;

    tracing::info!(post_id = %saved.id, author = %identity.username, "Blog post created");

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        post_response(saved, None),
        "Blog post created successfully",
    )))
}

/// GET /api/blogs
pub async fn list_posts(_identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts: Vec<PostResponse> = state
        .posts
        .list_with_authors()
        .await?
        .into_iter()
        .map(|(post, author)| post_response(post, author.as_ref()))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /api/blogs/{id}
pub async fn get_post(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post, None))))
}

/// PUT /api/blogs/{id}
pub async fn update_post(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mut post = load_post(&state, path.into_inner()).await?;

    // Only the author may mutate their post
    if post.author_id != identity.user_id {
        return Err(AppError::Forbidden);
    }

    post.apply_update(req.title, req.content);
    let saved = state.posts.update(post).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        post_response(saved, None),
        "Blog post updated",
    )))
}

/// DELETE /api/blogs/{id}
pub async fn delete_post(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;

    if post.author_id != identity.user_id {
        return Err(AppError::Forbidden);
    }

    // Comments on the post are removed by the storage layer cascade.
    state.posts.delete(post.id).await?;

    tracing::info!(post_id = %post.id, "Blog post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::message("Blog post deleted")))
}
