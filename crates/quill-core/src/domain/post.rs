use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication state of a post.
///
/// A post always starts as a draft. `Published` must hold a `published_at`
/// timestamp; `Draft` must not - the lifecycle methods below keep the two
/// fields in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

/// How the post body should be interpreted by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Html,
    Markdown,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Html => "html",
            ContentType::Markdown => "markdown",
        }
    }

    /// Anything other than `markdown` normalizes to `html`.
    pub fn from_requested(value: Option<&str>) -> Self {
        match value {
            Some("markdown") => ContentType::Markdown,
            _ => ContentType::Html,
        }
    }
}

/// Reference to an image held by the external media store. The core never
/// inspects it; `external_ref` is whatever handle the provider returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    pub url: String,
    pub external_ref: String,
}

/// Post entity - a long-form article owned by its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    /// URL-safe unique identifier. Assigned once at creation, never
    /// re-derived on edit.
    pub slug: String,
    pub excerpt: String,
    pub content_type: ContentType,
    pub content: String,
    pub cover_image: CoverImage,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update to a post. `None` fields are left unchanged. There is no
/// slug field: the slug is immutable after creation.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub content_type: Option<ContentType>,
    pub tags: Option<Vec<String>>,
    pub cover_image: Option<CoverImage>,
}

impl Post {
    /// Create a new draft with an already-allocated slug.
    #[allow(clippy::too_many_arguments)]
    pub fn new_draft(
        author_id: Uuid,
        title: String,
        slug: String,
        excerpt: String,
        content_type: ContentType,
        content: String,
        tags: Vec<String>,
        cover_image: CoverImage,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug,
            excerpt,
            content_type,
            content,
            cover_image,
            tags,
            status: PostStatus::Draft,
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Publish the post. Re-publishing an already-published post is allowed
    /// and refreshes `published_at`.
    pub fn publish(&mut self) {
        let now = Utc::now();
        self.status = PostStatus::Published;
        self.published_at = Some(now);
        self.updated_at = now;
    }

    /// Return the post to draft, clearing `published_at`.
    pub fn unpublish(&mut self) {
        self.status = PostStatus::Draft;
        self.published_at = None;
        self.updated_at = Utc::now();
    }

    /// Apply a partial update. Only supplied fields change; the state and
    /// slug are untouched.
    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(excerpt) = changes.excerpt {
            self.excerpt = excerpt;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(content_type) = changes.content_type {
            self.content_type = content_type;
        }
        if let Some(tags) = changes.tags {
            self.tags = tags;
        }
        if let Some(cover_image) = changes.cover_image {
            self.cover_image = cover_image;
        }
        self.updated_at = Utc::now();
    }
}

/// Trim tags and drop the empties.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Post {
        Post::new_draft(
            Uuid::new_v4(),
            "Hello".to_string(),
            "hello".to_string(),
            String::new(),
            ContentType::Html,
            "body".to_string(),
            vec![],
            CoverImage::default(),
        )
    }

    #[test]
    fn new_post_starts_as_draft() {
        let post = draft();
        assert_eq!(post.status, PostStatus::Draft);
        assert!(post.published_at.is_none());
    }

    #[test]
    fn publish_sets_timestamp_and_unpublish_clears_it() {
        let mut post = draft();
        post.publish();
        assert_eq!(post.status, PostStatus::Published);
        assert!(post.published_at.is_some());

        post.unpublish();
        assert_eq!(post.status, PostStatus::Draft);
        assert!(post.published_at.is_none());
    }

    #[test]
    fn republish_refreshes_published_at() {
        let mut post = draft();
        post.publish();
        let first = post.published_at.unwrap();
        post.publish();
        let second = post.published_at.unwrap();
        assert!(second >= first);
        assert_eq!(post.status, PostStatus::Published);
    }

    #[test]
    fn apply_changes_only_supplied_fields() {
        let mut post = draft();
        let slug = post.slug.clone();
        post.apply(PostChanges {
            title: Some("New title".to_string()),
            tags: Some(vec!["rust".to_string()]),
            ..Default::default()
        });

        assert_eq!(post.title, "New title");
        assert_eq!(post.tags, vec!["rust".to_string()]);
        assert_eq!(post.content, "body");
        assert_eq!(post.slug, slug);
        assert_eq!(post.status, PostStatus::Draft);
    }

    #[test]
    fn apply_does_not_rederive_slug_from_title() {
        let mut post = draft();
        post.apply(PostChanges {
            title: Some("Completely Different".to_string()),
            ..Default::default()
        });
        assert_eq!(post.slug, "hello");
    }

    #[test]
    fn tags_are_trimmed_and_empties_dropped() {
        let tags = normalize_tags(["  rust ", "", "   ", "web"]);
        assert_eq!(tags, vec!["rust".to_string(), "web".to_string()]);
    }

    #[test]
    fn content_type_falls_back_to_html() {
        assert_eq!(
            ContentType::from_requested(Some("markdown")),
            ContentType::Markdown
        );
        assert_eq!(ContentType::from_requested(Some("html")), ContentType::Html);
        assert_eq!(ContentType::from_requested(Some("pdf")), ContentType::Html);
        assert_eq!(ContentType::from_requested(None), ContentType::Html);
    }
}
