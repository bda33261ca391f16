//! Post handlers: listings, detail, creation, edits, lifecycle transitions
//! and cascading deletion.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use quill_core::domain::{
    ContentType, CoverImage, Post, PostChanges, PostStatus, User, normalize_tags,
};
use quill_core::pagination::{Page, PageRequest};
use quill_core::policy::{Action, Resource, decide};
use quill_core::slug;
use quill_shared::dto::{CoverImageDto, CreatePostRequest, PostDetailResponse, UpdatePostRequest};

use crate::handlers::convert::{comment_response, post_response};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const TITLE_MAX: usize = 180;
const EXCERPT_MAX: usize = 400;
const TAG_MAX: usize = 40;

/// Slug allocation re-runs when the storage-level unique index beats the
/// probe to a candidate. More than a couple of rounds means something other
/// than a title collision is wrong.
const SLUG_ALLOCATION_ATTEMPTS: u32 = 3;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MineQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<String>,
}

fn validate_title(title: &str) -> Result<String, AppError> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if title.len() > TITLE_MAX {
        return Err(AppError::Validation(format!(
            "Title must be at most {TITLE_MAX} characters"
        )));
    }
    Ok(title)
}

fn validate_excerpt(excerpt: &str) -> Result<String, AppError> {
    let excerpt = excerpt.trim().to_string();
    if excerpt.len() > EXCERPT_MAX {
        return Err(AppError::Validation(format!(
            "Excerpt must be at most {EXCERPT_MAX} characters"
        )));
    }
    Ok(excerpt)
}

fn validate_tags(tags: Vec<String>) -> Result<Vec<String>, AppError> {
    let tags = normalize_tags(tags);
    if tags.iter().any(|t| t.len() > TAG_MAX) {
        return Err(AppError::Validation(format!(
            "Tags must be at most {TAG_MAX} characters"
        )));
    }
    Ok(tags)
}

/// An image reference without a URL means "no cover image".
fn cover_image_from(dto: Option<CoverImageDto>) -> CoverImage {
    match dto {
        Some(dto) if !dto.url.is_empty() => CoverImage {
            url: dto.url,
            external_ref: dto.external_ref,
        },
        _ => CoverImage::default(),
    }
}

/// Batch-resolve the authors referenced by `ids` for read-time joins.
async fn resolve_authors(state: &AppState, ids: &[Uuid]) -> AppResult<HashMap<Uuid, User>> {
    let mut unique: Vec<Uuid> = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    let users = state.users.find_by_ids(&unique).await?;
    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}

/// GET /api/posts - public, published posts only.
pub async fn list_published(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let caller = identity.caller();
    decide(caller.as_ref(), Resource::None, Action::ListPublishedPosts).into_result()?;

    let query = query.into_inner();
    let page = PageRequest::clamped(query.page, query.limit);

    let (posts, total) = state
        .posts
        .list_published(query.q.as_deref(), page)
        .await?;

    let author_ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
    let authors = resolve_authors(&state, &author_ids).await?;

    let items = posts
        .iter()
        .map(|post| post_response(post, authors.get(&post.author_id)))
        .collect();

    Ok(HttpResponse::Ok().json(Page::new(items, page, total)))
}

/// GET /api/posts/mine - the caller's own posts, any status.
pub async fn list_mine(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<MineQuery>,
) -> AppResult<HttpResponse> {
    decide(Some(&identity.caller()), Resource::None, Action::ListOwnPosts).into_result()?;

    let query = query.into_inner();
    let page = PageRequest::clamped(query.page, query.limit);

    let status = match query.status.as_deref() {
        Some("draft") => Some(PostStatus::Draft),
        Some("published") => Some(PostStatus::Published),
        _ => None,
    };

    let (posts, total) = state
        .posts
        .list_by_author(identity.user_id, status, page)
        .await?;

    let items = posts.iter().map(|post| post_response(post, None)).collect();

    Ok(HttpResponse::Ok().json(Page::new(items, page, total)))
}

/// GET /api/posts/{slug} - post detail with comments. A draft is only
/// visible to its author; everyone else sees a plain 404.
pub async fn detail_by_slug(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner().trim().to_lowercase();

    let post = state
        .posts
        .find_by_slug(&slug)
        .await?
        .ok_or(AppError::NotFound)?;

    let caller = identity.caller();
    decide(caller.as_ref(), Resource::Post(&post), Action::ReadPost).into_result()?;

    let comments = state.comments.list_for_post(post.id).await?;

    let mut author_ids: Vec<Uuid> = comments.iter().map(|c| c.author_id).collect();
    author_ids.push(post.author_id);
    let authors = resolve_authors(&state, &author_ids).await?;

    let response = PostDetailResponse {
        post: post_response(&post, authors.get(&post.author_id)),
        comments: comments
            .iter()
            .map(|c| comment_response(c, authors.get(&c.author_id)))
            .collect(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/posts - create a draft with a freshly allocated slug.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    decide(Some(&identity.caller()), Resource::None, Action::CreatePost).into_result()?;

    let req = body.into_inner();

    let title = validate_title(&req.title)?;
    if req.content.is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }
    let excerpt = validate_excerpt(req.excerpt.as_deref().unwrap_or_default())?;
    let tags = validate_tags(req.tags.unwrap_or_default())?;
    let content_type = ContentType::from_requested(req.content_type.as_deref());
    let cover_image = cover_image_from(req.cover_image);

    for attempt in 1..=SLUG_ALLOCATION_ATTEMPTS {
        let allocated = slug::allocate(state.posts.as_ref(), &title).await?;

        let post = Post::new_draft(
            identity.user_id,
            title.clone(),
            allocated,
            excerpt.clone(),
            content_type,
            req.content.clone(),
            tags.clone(),
            cover_image.clone(),
        );

        match state.posts.insert(post).await {
            Ok(saved) => {
                tracing::info!(post_id = %saved.id, slug = %saved.slug, "Post created");
                return Ok(HttpResponse::Created().json(post_response(&saved, None)));
            }
            Err(quill_core::error::RepoError::Constraint(msg)) => {
                tracing::debug!(attempt, %msg, "Slug taken by a concurrent writer, reallocating");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Internal(
        "Slug allocation kept colliding".to_string(),
    ))
}

/// PUT /api/posts/{id} - partial update, owner only.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let mut post = state
        .posts
        .find_by_id(path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    decide(
        Some(&identity.caller()),
        Resource::Post(&post),
        Action::EditPost,
    )
    .into_result()?;

    let req = body.into_inner();

    let changes = PostChanges {
        title: req.title.as_deref().map(validate_title).transpose()?,
        excerpt: req.excerpt.as_deref().map(validate_excerpt).transpose()?,
        content: req.content,
        content_type: req
            .content_type
            .as_deref()
            .map(|ct| ContentType::from_requested(Some(ct))),
        tags: req.tags.map(validate_tags).transpose()?,
        cover_image: req.cover_image.map(|dto| cover_image_from(Some(dto))),
    };

    post.apply(changes);
    let saved = state.posts.update(post).await?;

    Ok(HttpResponse::Ok().json(post_response(&saved, None)))
}

/// POST /api/posts/{id}/publish - draft to published, owner only.
pub async fn publish(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let mut post = state
        .posts
        .find_by_id(path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    decide(
        Some(&identity.caller()),
        Resource::Post(&post),
        Action::PublishPost,
    )
    .into_result()?;

    post.publish();
    let saved = state.posts.update(post).await?;

    tracing::info!(post_id = %saved.id, slug = %saved.slug, "Post published");

    Ok(HttpResponse::Ok().json(post_response(&saved, None)))
}

/// POST /api/posts/{id}/unpublish - back to draft, owner only.
pub async fn unpublish(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let mut post = state
        .posts
        .find_by_id(path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    decide(
        Some(&identity.caller()),
        Resource::Post(&post),
        Action::UnpublishPost,
    )
    .into_result()?;

    post.unpublish();
    let saved = state.posts.update(post).await?;

    tracing::info!(post_id = %saved.id, slug = %saved.slug, "Post unpublished");

    Ok(HttpResponse::Ok().json(post_response(&saved, None)))
}

/// DELETE /api/posts/{id} - owner only; removes the post's comments first
/// so none outlive it.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_id(path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    decide(
        Some(&identity.caller()),
        Resource::Post(&post),
        Action::DeletePost,
    )
    .into_result()?;

    let removed_comments = state.comments.delete_for_post(post.id).await?;
    state.posts.delete(post.id).await?;

    tracing::info!(
        post_id = %post.id,
        slug = %post.slug,
        removed_comments,
        "Post deleted"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Deleted" })))
}
