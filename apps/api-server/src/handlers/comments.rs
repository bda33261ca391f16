//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::Comment;
use quill_core::policy::{Action, Resource, decide};
use quill_shared::dto::CreateCommentRequest;

use crate::handlers::convert::comment_response;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/comments/{post_id} - comment on a published post.
///
/// Authentication is resolved optionally so the policy can order its
/// checks: a draft is reported absent before the caller's credentials are
/// considered at all.
pub async fn create(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_id(path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    let caller = identity.caller();
    decide(caller.as_ref(), Resource::Post(&post), Action::CreateComment).into_result()?;

    // Allowed implies authenticated.
    let Some(identity) = identity.0 else {
        return Err(AppError::Unauthorized);
    };

    let content = body.into_inner().content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::Validation("Comment content is required".to_string()));
    }

    let saved = state
        .comments
        .insert(Comment::new(post.id, identity.user_id, content))
        .await?;

    // Read-time join: the author's current name travels with the comment.
    let author = state.users.find_by_id(identity.user_id).await?;

    Ok(HttpResponse::Created().json(comment_response(&saved, author.as_ref())))
}

/// DELETE /api/comments/{id} - by the comment's author, or the parent
/// post's author as moderation.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .find_by_id(path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    let post = state.posts.find_by_id(comment.post_id).await?;

    decide(
        Some(&identity.caller()),
        Resource::Comment {
            comment: &comment,
            post: post.as_ref(),
        },
        Action::DeleteComment,
    )
    .into_result()?;

    state.comments.delete(comment.id).await?;

    tracing::info!(comment_id = %comment.id, post_id = %comment.post_id, "Comment deleted");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Deleted" })))
}
