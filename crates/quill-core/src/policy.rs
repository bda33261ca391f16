//! Authorization policy - a pure decision function.
//!
//! Every read and mutation in the system asks this module before touching
//! storage. No action is allowed by default: each [`Action`] must match an
//! explicit rule in [`decide`], and the match is exhaustive so adding an
//! action without a rule fails to compile.
//!
//! Draft posts are masked: a caller who may not see a draft is told
//! [`DenyReason::NotFound`], never `Forbidden`, so the response for a
//! private draft is indistinguishable from a slug that was never allocated.

use uuid::Uuid;

use crate::domain::{Comment, Post, Role};
use crate::error::DomainError;

/// Resolved identity of the caller making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
}

/// Everything a caller can ask to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListPublishedPosts,
    ListOwnPosts,
    ReadPost,
    CreatePost,
    EditPost,
    PublishPost,
    UnpublishPost,
    DeletePost,
    ReadComments,
    CreateComment,
    DeleteComment,
    UploadMedia,
}

/// The resource an action targets, when it targets one.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    /// Collection-level actions (create, list, upload).
    None,
    Post(&'a Post),
    /// The parent post may already be gone; a dangling comment is then
    /// deletable only by its own author.
    Comment {
        comment: &'a Comment,
        post: Option<&'a Post>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotAuthenticated,
    Forbidden,
    NotFound,
}

impl Decision {
    /// Turn the decision into a `Result` for use with `?` in handlers.
    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::NotAuthenticated) => Err(DomainError::NotAuthenticated),
            Decision::Deny(DenyReason::Forbidden) => Err(DomainError::Forbidden),
            Decision::Deny(DenyReason::NotFound) => Err(DomainError::NotFound),
        }
    }
}

/// Decide whether `caller` may perform `action` on `resource`.
pub fn decide(caller: Option<&Caller>, resource: Resource<'_>, action: Action) -> Decision {
    match action {
        // Public reads over published content.
        Action::ListPublishedPosts => Decision::Allow,

        Action::ReadPost | Action::ReadComments => match resource {
            Resource::Post(post) => read_post(caller, post),
            _ => Decision::Deny(DenyReason::NotFound),
        },

        // Owner-only post mutations; require the author role.
        Action::EditPost | Action::PublishPost | Action::UnpublishPost | Action::DeletePost => {
            match resource {
                Resource::Post(post) => mutate_post(caller, post),
                _ => Decision::Deny(DenyReason::NotFound),
            }
        }

        // Collection-level author actions.
        Action::CreatePost | Action::ListOwnPosts | Action::UploadMedia => require_author(caller),

        Action::CreateComment => match resource {
            Resource::Post(post) => create_comment(caller, post),
            _ => Decision::Deny(DenyReason::NotFound),
        },

        Action::DeleteComment => match resource {
            Resource::Comment { comment, post } => delete_comment(caller, comment, post),
            _ => Decision::Deny(DenyReason::NotFound),
        },
    }
}

fn read_post(caller: Option<&Caller>, post: &Post) -> Decision {
    if post.is_published() {
        return Decision::Allow;
    }
    match caller {
        Some(c) if c.id == post.author_id => Decision::Allow,
        // Masked: the draft's existence is not confirmed to anyone else.
        _ => Decision::Deny(DenyReason::NotFound),
    }
}

fn mutate_post(caller: Option<&Caller>, post: &Post) -> Decision {
    let Some(caller) = caller else {
        return Decision::Deny(DenyReason::NotAuthenticated);
    };
    if caller.role != Role::Author {
        return Decision::Deny(DenyReason::Forbidden);
    }
    if caller.id != post.author_id {
        return Decision::Deny(DenyReason::Forbidden);
    }
    Decision::Allow
}

fn require_author(caller: Option<&Caller>) -> Decision {
    match caller {
        None => Decision::Deny(DenyReason::NotAuthenticated),
        Some(c) if c.role == Role::Author => Decision::Allow,
        Some(_) => Decision::Deny(DenyReason::Forbidden),
    }
}

fn create_comment(caller: Option<&Caller>, post: &Post) -> Decision {
    // The draft check comes first: an unpublished post is reported as
    // absent even before authentication is considered.
    if !post.is_published() {
        return Decision::Deny(DenyReason::NotFound);
    }
    match caller {
        Some(_) => Decision::Allow,
        None => Decision::Deny(DenyReason::NotAuthenticated),
    }
}

fn delete_comment(caller: Option<&Caller>, comment: &Comment, post: Option<&Post>) -> Decision {
    let Some(caller) = caller else {
        return Decision::Deny(DenyReason::NotAuthenticated);
    };
    let owns_comment = caller.id == comment.author_id;
    let owns_post = post.is_some_and(|p| p.author_id == caller.id);
    if owns_comment || owns_post {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Comment, ContentType, CoverImage, Post};

    fn post_by(author_id: Uuid) -> Post {
        Post::new_draft(
            author_id,
            "Title".to_string(),
            "title".to_string(),
            String::new(),
            ContentType::Html,
            "content".to_string(),
            vec![],
            CoverImage::default(),
        )
    }

    fn author() -> Caller {
        Caller {
            id: Uuid::new_v4(),
            role: Role::Author,
        }
    }

    fn reader() -> Caller {
        Caller {
            id: Uuid::new_v4(),
            role: Role::Reader,
        }
    }

    #[test]
    fn anonymous_may_read_published() {
        let mut post = post_by(Uuid::new_v4());
        post.publish();
        assert_eq!(
            decide(None, Resource::Post(&post), Action::ReadPost),
            Decision::Allow
        );
        assert_eq!(
            decide(None, Resource::Post(&post), Action::ReadComments),
            Decision::Allow
        );
        assert_eq!(
            decide(None, Resource::None, Action::ListPublishedPosts),
            Decision::Allow
        );
    }

    #[test]
    fn draft_is_masked_as_not_found_for_everyone_but_the_author() {
        let owner = author();
        let post = post_by(owner.id);

        assert_eq!(
            decide(None, Resource::Post(&post), Action::ReadPost),
            Decision::Deny(DenyReason::NotFound)
        );
        assert_eq!(
            decide(Some(&reader()), Resource::Post(&post), Action::ReadPost),
            Decision::Deny(DenyReason::NotFound)
        );
        assert_eq!(
            decide(Some(&author()), Resource::Post(&post), Action::ReadPost),
            Decision::Deny(DenyReason::NotFound)
        );
        assert_eq!(
            decide(Some(&owner), Resource::Post(&post), Action::ReadPost),
            Decision::Allow
        );
    }

    #[test]
    fn post_mutations_require_the_owning_author() {
        let owner = author();
        let post = post_by(owner.id);

        for action in [
            Action::EditPost,
            Action::PublishPost,
            Action::UnpublishPost,
            Action::DeletePost,
        ] {
            assert_eq!(
                decide(None, Resource::Post(&post), action),
                Decision::Deny(DenyReason::NotAuthenticated)
            );
            assert_eq!(
                decide(Some(&reader()), Resource::Post(&post), action),
                Decision::Deny(DenyReason::Forbidden)
            );
            assert_eq!(
                decide(Some(&author()), Resource::Post(&post), action),
                Decision::Deny(DenyReason::Forbidden)
            );
            assert_eq!(decide(Some(&owner), Resource::Post(&post), action), Decision::Allow);
        }
    }

    #[test]
    fn create_post_requires_author_role() {
        assert_eq!(
            decide(None, Resource::None, Action::CreatePost),
            Decision::Deny(DenyReason::NotAuthenticated)
        );
        assert_eq!(
            decide(Some(&reader()), Resource::None, Action::CreatePost),
            Decision::Deny(DenyReason::Forbidden)
        );
        assert_eq!(
            decide(Some(&author()), Resource::None, Action::CreatePost),
            Decision::Allow
        );
    }

    #[test]
    fn own_listing_and_uploads_require_author_role() {
        for action in [Action::ListOwnPosts, Action::UploadMedia] {
            assert_eq!(
                decide(Some(&reader()), Resource::None, action),
                Decision::Deny(DenyReason::Forbidden)
            );
            assert_eq!(decide(Some(&author()), Resource::None, action), Decision::Allow);
        }
    }

    #[test]
    fn commenting_needs_authentication_and_a_published_post() {
        let owner = author();
        let mut post = post_by(owner.id);

        // Draft: masked before authentication is even considered.
        assert_eq!(
            decide(None, Resource::Post(&post), Action::CreateComment),
            Decision::Deny(DenyReason::NotFound)
        );
        assert_eq!(
            decide(Some(&owner), Resource::Post(&post), Action::CreateComment),
            Decision::Deny(DenyReason::NotFound)
        );

        post.publish();
        assert_eq!(
            decide(None, Resource::Post(&post), Action::CreateComment),
            Decision::Deny(DenyReason::NotAuthenticated)
        );
        assert_eq!(
            decide(Some(&reader()), Resource::Post(&post), Action::CreateComment),
            Decision::Allow
        );
    }

    #[test]
    fn comment_deletable_by_its_author_or_the_post_author() {
        let post_owner = author();
        let commenter = reader();
        let mut post = post_by(post_owner.id);
        post.publish();
        let comment = Comment::new(post.id, commenter.id, "hi".to_string());

        let resource = Resource::Comment {
            comment: &comment,
            post: Some(&post),
        };
        assert_eq!(
            decide(Some(&commenter), resource, Action::DeleteComment),
            Decision::Allow
        );
        assert_eq!(
            decide(Some(&post_owner), resource, Action::DeleteComment),
            Decision::Allow
        );
        assert_eq!(
            decide(Some(&reader()), resource, Action::DeleteComment),
            Decision::Deny(DenyReason::Forbidden)
        );
        assert_eq!(
            decide(None, resource, Action::DeleteComment),
            Decision::Deny(DenyReason::NotAuthenticated)
        );
    }

    #[test]
    fn dangling_comment_is_deletable_only_by_its_author() {
        let commenter = reader();
        let comment = Comment::new(Uuid::new_v4(), commenter.id, "hi".to_string());
        let resource = Resource::Comment {
            comment: &comment,
            post: None,
        };

        assert_eq!(
            decide(Some(&commenter), resource, Action::DeleteComment),
            Decision::Allow
        );
        assert_eq!(
            decide(Some(&author()), resource, Action::DeleteComment),
            Decision::Deny(DenyReason::Forbidden)
        );
    }
}
