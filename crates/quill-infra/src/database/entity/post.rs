//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain;

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ContentType {
    #[sea_orm(string_value = "html")]
    Html,
    #[sea_orm(string_value = "markdown")]
    Markdown,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub excerpt: String,
    pub content_type: ContentType,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub cover_image_url: String,
    pub cover_image_ref: String,
    pub tags: Json,
    pub status: Status,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Status> for domain::PostStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => domain::PostStatus::Draft,
            Status::Published => domain::PostStatus::Published,
        }
    }
}

impl From<domain::PostStatus> for Status {
    fn from(status: domain::PostStatus) -> Self {
        match status {
            domain::PostStatus::Draft => Status::Draft,
            domain::PostStatus::Published => Status::Published,
        }
    }
}

impl From<ContentType> for domain::ContentType {
    fn from(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Html => domain::ContentType::Html,
            ContentType::Markdown => domain::ContentType::Markdown,
        }
    }
}

impl From<domain::ContentType> for ContentType {
    fn from(content_type: domain::ContentType) -> Self {
        match content_type {
            domain::ContentType::Html => ContentType::Html,
            domain::ContentType::Markdown => ContentType::Markdown,
        }
    }
}

impl From<Model> for domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            slug: model.slug,
            excerpt: model.excerpt,
            content_type: model.content_type.into(),
            content: model.content,
            cover_image: domain::CoverImage {
                url: model.cover_image_url,
                external_ref: model.cover_image_ref,
            },
            tags: serde_json::from_value(model.tags).unwrap_or_default(),
            status: model.status.into(),
            published_at: model.published_at.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<domain::Post> for ActiveModel {
    fn from(post: domain::Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title),
            slug: Set(post.slug),
            excerpt: Set(post.excerpt),
            content_type: Set(post.content_type.into()),
            content: Set(post.content),
            cover_image_url: Set(post.cover_image.url),
            cover_image_ref: Set(post.cover_image.external_ref),
            tags: Set(serde_json::json!(post.tags)),
            status: Set(post.status.into()),
            published_at: Set(post.published_at.map(Into::into)),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
