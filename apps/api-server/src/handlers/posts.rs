//! Post handlers - the HTTP surface over the lifecycle policy.
//!
//! Handlers stay thin: one clock reading per request, the viewer threaded
//! in from the extractors, and every decision delegated to
//! `quill_core::policy`.

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use quill_core::DomainError;
use quill_core::domain::{Lifecycle, Post};
use quill_core::policy::{
    Action, PostInput, PostQuery, StatusFilter, can_mutate, can_view, resolve_post_fields,
};
use quill_shared::dto::{ListPostsParams, PageResponse, PostRequest, PostResponse};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn to_input(req: PostRequest) -> PostInput {
    PostInput {
        title: req.title,
        content: req.content,
        is_draft: req.is_draft,
        published_at: req.published_at,
    }
}

fn to_response(post: Post, now: DateTime<Utc>) -> PostResponse {
    let status = match post.lifecycle(now) {
        Lifecycle::Draft => "draft",
        Lifecycle::Scheduled => "scheduled",
        Lifecycle::Published => "published",
        Lifecycle::Deleted => "deleted",
    };

    PostResponse {
        id: post.id,
        user_id: post.user_id,
        title: post.title,
        content: post.content,
        is_draft: post.is_draft,
        published_at: post.published_at,
        created_at: post.created_at,
        updated_at: post.updated_at,
        deleted_at: post.deleted_at,
        status: status.to_string(),
    }
}

/// GET /api/posts
///
/// Public listing by default; `status=draft|scheduled|deleted` switches to
/// the viewer's own posts in that state.
pub async fn list(
    state: web::Data<AppState>,
    params: web::Query<ListPostsParams>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let now = state.clock.now();

    let status = params
        .status
        .as_deref()
        .map(StatusFilter::parse)
        .unwrap_or_default();
    let query = PostQuery::new(status, viewer.user_id(), params.page.unwrap_or(1));

    let page = state.posts.list(query, now).await?;
    let last_page = page.last_page();

    Ok(HttpResponse::Ok().json(PageResponse {
        data: page
            .items
            .into_iter()
            .map(|post| to_response(post, now))
            .collect(),
        current_page: page.page,
        last_page,
        per_page: page.per_page,
        total: page.total,
    }))
}

/// GET /api/posts/{id}
///
/// An unpublished or trashed post is indistinguishable from a missing one
/// unless the viewer is its author.
pub async fn show(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let now = state.clock.now();

    let post = state
        .posts
        .find(id, true)
        .await?
        .filter(|post| can_view(post, viewer.user_id(), now))
        .ok_or(DomainError::post_not_found(id))?;

    Ok(HttpResponse::Ok().json(to_response(post, now)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let now = state.clock.now();

    let fields = resolve_post_fields(&to_input(body.into_inner()), None, now)?;
    let post = Post::new(
        identity.user_id,
        fields.title,
        fields.content,
        fields.is_draft,
        fields.published_at,
        now,
    );

    let saved = state.posts.save(post).await?;
    tracing::debug!(post_id = %saved.id, "Post created");

    Ok(HttpResponse::Created().json(to_response(saved, now)))
}

/// PATCH /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let now = state.clock.now();

    let mut post = state
        .posts
        .find(id, false)
        .await?
        .ok_or(DomainError::post_not_found(id))?;

    if !can_mutate(&post, identity.user_id, Action::Update) {
        return Err(AppError::Forbidden);
    }

    let fields = resolve_post_fields(&to_input(body.into_inner()), Some(post.is_draft), now)?;
    post.title = fields.title;
    post.content = fields.content;
    post.is_draft = fields.is_draft;
    post.published_at = fields.published_at;
    post.updated_at = now;

    let saved = state.posts.save(post).await?;

    Ok(HttpResponse::Ok().json(to_response(saved, now)))
}

/// DELETE /api/posts/{id}
pub async fn destroy(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let now = state.clock.now();

    let post = state
        .posts
        .find(id, false)
        .await?
        .ok_or(DomainError::post_not_found(id))?;

    if !can_mutate(&post, identity.user_id, Action::Delete) {
        return Err(AppError::Forbidden);
    }

    state.posts.soft_delete(id, now).await?;
    tracing::debug!(post_id = %id, "Post soft-deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/posts/{id}/restore
pub async fn restore(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let now = state.clock.now();

    let mut post = state
        .posts
        .find(id, true)
        .await?
        .ok_or(DomainError::post_not_found(id))?;

    if !can_mutate(&post, identity.user_id, Action::Restore) {
        return Err(AppError::Forbidden);
    }

    state.posts.restore(id).await?;
    post.deleted_at = None;
    tracing::debug!(post_id = %id, "Post restored");

    Ok(HttpResponse::Ok().json(to_response(post, now)))
}
