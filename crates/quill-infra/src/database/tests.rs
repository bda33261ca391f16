use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, RuntimeErr, Value};
use uuid::Uuid;

use quill_core::domain::{Post, PostStatus};
use quill_core::error::RepoError;
use quill_core::pagination::PageRequest;
use quill_core::ports::{CommentRepository, PostRepository};

use crate::database::entity::post;
use crate::database::postgres_repo::{PostgresCommentRepository, PostgresPostRepository};

fn post_model(slug: &str, status: post::Status) -> post::Model {
    let now = Utc::now();
    post::Model {
        id: Uuid::new_v4(),
        author_id: Uuid::new_v4(),
        title: "Test Post".to_owned(),
        slug: slug.to_owned(),
        excerpt: String::new(),
        content_type: post::ContentType::Html,
        content: "Content".to_owned(),
        cover_image_url: String::new(),
        cover_image_ref: String::new(),
        tags: serde_json::json!(["rust"]),
        status,
        published_at: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn find_by_slug_maps_into_domain() {
    let model = post_model("test-post", post::Status::Draft);
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let found: Option<Post> = repo.find_by_slug("test-post").await.unwrap();

    let found = found.unwrap();
    assert_eq!(found.id, post_id);
    assert_eq!(found.slug, "test-post");
    assert_eq!(found.status, PostStatus::Draft);
    assert_eq!(found.tags, vec!["rust".to_string()]);
}

#[tokio::test]
async fn duplicate_slug_surfaces_as_constraint_violation() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([sea_orm::DbErr::Query(RuntimeErr::Internal(
            "duplicate key value violates unique constraint \"idx_posts_slug\"".to_owned(),
        ))])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let model = post_model("taken", post::Status::Draft);

    let result = repo.insert(model.into()).await;

    assert!(matches!(result, Err(RepoError::Constraint(_))));
}

#[tokio::test]
async fn list_published_returns_items_and_total() {
    let count_row: BTreeMap<&str, Value> = BTreeMap::from([("num_items", Value::from(17i64))]);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row]])
        .append_query_results([vec![post_model("page-item", post::Status::Published)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let page = PageRequest { page: 3, limit: 8 };

    let (items, total) = repo.list_published(None, page).await.unwrap();

    assert_eq!(total, 17);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].slug, "page-item");
}

#[tokio::test]
async fn delete_for_post_reports_removed_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 3,
        }])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);

    let removed = repo.delete_for_post(Uuid::new_v4()).await.unwrap();

    assert_eq!(removed, 3);
}

#[tokio::test]
async fn delete_of_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = repo.delete(Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}
