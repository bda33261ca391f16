//! Storage ports.
//!
//! Storage is a document store reachable by key lookup, filtered scan, and
//! single-document update. Unique indexes on `users.email` and `posts.slug`
//! are part of the contract: `insert` must surface their violation as
//! [`RepoError::Constraint`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, PostStatus, User};
use crate::error::RepoError;
use crate::pagination::PageRequest;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Batch lookup for read-time author joins.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;

    /// Lookup by the unique (lowercased) email key.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn insert(&self, user: User) -> Result<User, RepoError>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Lookup by the unique slug key, drafts included.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Whole-document update; last writer wins.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Published posts, optionally filtered by a case-insensitive substring
    /// match over title/excerpt/content, sorted `published_at DESC,
    /// created_at DESC`. Returns the page of items and the total match count.
    async fn list_published(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Post>, u64), RepoError>;

    /// One author's posts in any status, sorted `updated_at DESC`.
    async fn list_by_author(
        &self,
        author_id: Uuid,
        status: Option<PostStatus>,
        page: PageRequest,
    ) -> Result<(Vec<Post>, u64), RepoError>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError>;

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// All comments of one post, newest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// Cascade step of post deletion. Returns the number removed.
    async fn delete_for_post(&self, post_id: Uuid) -> Result<u64, RepoError>;
}
