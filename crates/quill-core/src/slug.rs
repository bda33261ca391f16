//! Slug derivation and uniqueness allocation.
//!
//! [`slugify`] is a deterministic transform of the title; [`allocate`]
//! probes storage for an unused candidate (`base`, `base-1`, `base-2`, ...).
//! The probe is only a convenience: the storage layer's unique index on the
//! slug column is the authoritative guard, and creation retries with the
//! next probe value when that index rejects a concurrent duplicate.

use crate::error::RepoError;
use crate::ports::PostRepository;

/// Base candidate for titles that collapse to nothing.
pub const FALLBACK_SLUG: &str = "post";

/// Lowercase the title, keep alphanumeric runs, and collapse everything else
/// into single `-` separators with none leading or trailing.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Find a slug unused at the moment of return.
///
/// Two concurrent calls with the same title can both pass the probe for the
/// same candidate; the caller must treat a unique-constraint rejection at
/// insert time as "allocate again".
pub async fn allocate(posts: &dyn PostRepository, title: &str) -> Result<String, RepoError> {
    let base = slugify(title);
    let mut candidate = base.clone();
    let mut suffix = 0u32;

    loop {
        if posts.find_by_slug(&candidate).await?.is_none() {
            return Ok(candidate);
        }
        suffix += 1;
        candidate = format!("{base}-{suffix}");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{ContentType, CoverImage, Post, PostStatus};
    use crate::pagination::PageRequest;

    #[test]
    fn slugify_lowercases_and_collapses_separators() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust   2024  "), "rust-2024");
        assert_eq!(slugify("a--b__c"), "a-b-c");
    }

    #[test]
    fn slugify_trims_leading_and_trailing_separators() {
        assert_eq!(slugify("...dots..."), "dots");
        assert_eq!(slugify("-already-slugged-"), "already-slugged");
    }

    #[test]
    fn slugify_falls_back_when_nothing_survives() {
        assert_eq!(slugify(""), FALLBACK_SLUG);
        assert_eq!(slugify("!!! ???"), FALLBACK_SLUG);
    }

    #[test]
    fn slugify_drops_non_ascii() {
        assert_eq!(slugify("Café au lait"), "caf-au-lait");
    }

    /// Minimal in-memory stand-in: only `find_by_slug` matters here.
    struct TakenSlugs(Mutex<HashSet<String>>);

    impl TakenSlugs {
        fn of(slugs: &[&str]) -> Self {
            Self(Mutex::new(slugs.iter().map(|s| s.to_string()).collect()))
        }

        fn fake_post(slug: &str) -> Post {
            Post::new_draft(
                Uuid::new_v4(),
                slug.to_string(),
                slug.to_string(),
                String::new(),
                ContentType::Html,
                String::new(),
                vec![],
                CoverImage::default(),
            )
        }
    }

    #[async_trait]
    impl PostRepository for TakenSlugs {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Post>, RepoError> {
            Ok(None)
        }

        async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
            let taken = self.0.lock().unwrap();
            Ok(taken.contains(slug).then(|| Self::fake_post(slug)))
        }

        async fn insert(&self, post: Post) -> Result<Post, RepoError> {
            let mut taken = self.0.lock().unwrap();
            if !taken.insert(post.slug.clone()) {
                return Err(RepoError::Constraint("posts_slug_key".to_string()));
            }
            Ok(post)
        }

        async fn update(&self, post: Post) -> Result<Post, RepoError> {
            Ok(post)
        }

        async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
            Ok(())
        }

        async fn list_published(
            &self,
            _search: Option<&str>,
            _page: PageRequest,
        ) -> Result<(Vec<Post>, u64), RepoError> {
            Ok((vec![], 0))
        }

        async fn list_by_author(
            &self,
            _author_id: Uuid,
            _status: Option<PostStatus>,
            _page: PageRequest,
        ) -> Result<(Vec<Post>, u64), RepoError> {
            Ok((vec![], 0))
        }
    }

    #[tokio::test]
    async fn allocate_returns_base_when_unused() {
        let posts = TakenSlugs::of(&[]);
        assert_eq!(allocate(&posts, "My Post").await.unwrap(), "my-post");
    }

    #[tokio::test]
    async fn allocate_probes_past_taken_candidates() {
        let posts = TakenSlugs::of(&["my-post", "my-post-1"]);
        assert_eq!(allocate(&posts, "My Post").await.unwrap(), "my-post-2");
    }

    #[tokio::test]
    async fn allocate_uses_fallback_base_for_empty_titles() {
        let posts = TakenSlugs::of(&["post"]);
        assert_eq!(allocate(&posts, "!!!").await.unwrap(), "post-1");
    }
}
