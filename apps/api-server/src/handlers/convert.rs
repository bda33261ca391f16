//! Domain-to-DTO conversions shared by the handlers.

use quill_core::domain::{Comment, CoverImage, Post, User};
use quill_shared::dto::{
    AuthorResponse, CommentResponse, CoverImageDto, PostResponse, UserResponse,
};

pub fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        created_at: user.created_at.to_rfc3339(),
    }
}

pub fn author_response(user: &User) -> AuthorResponse {
    AuthorResponse {
        id: user.id.to_string(),
        name: user.name.clone(),
        role: user.role.as_str().to_string(),
    }
}

pub fn cover_image_dto(cover: &CoverImage) -> CoverImageDto {
    CoverImageDto {
        url: cover.url.clone(),
        external_ref: cover.external_ref.clone(),
    }
}

/// `author` is supplied on public reads, where it comes from a read-time
/// join; owner listings leave it out.
pub fn post_response(post: &Post, author: Option<&User>) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        author_id: post.author_id.to_string(),
        author: author.map(author_response),
        title: post.title.clone(),
        slug: post.slug.clone(),
        excerpt: post.excerpt.clone(),
        content_type: post.content_type.as_str().to_string(),
        content: post.content.clone(),
        cover_image: cover_image_dto(&post.cover_image),
        tags: post.tags.clone(),
        status: post.status.as_str().to_string(),
        published_at: post.published_at.map(|t| t.to_rfc3339()),
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}

pub fn comment_response(comment: &Comment, author: Option<&User>) -> CommentResponse {
    CommentResponse {
        id: comment.id.to_string(),
        post_id: comment.post_id.to_string(),
        author: author.map(author_response),
        content: comment.content.clone(),
        created_at: comment.created_at.to_rfc3339(),
    }
}
