//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{CommentRepository, MediaStore, PostRepository, UserRepository};
use quill_infra::database::{
    Db, PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository,
};
use quill_infra::media::CloudinaryMediaStore;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    /// `None` until the provider credentials are configured; uploads then
    /// fail with a configuration error instead of a broken call.
    pub media: Option<Arc<dyn MediaStore>>,
}

impl AppState {
    /// Build the application state. The database is required; without it
    /// the server refuses to start.
    pub async fn init(config: &AppConfig) -> Result<Self, StateError> {
        let Some(db_config) = &config.database else {
            return Err(StateError::MissingDatabaseUrl);
        };

        let db = Db::connect(db_config).await?;

        let media: Option<Arc<dyn MediaStore>> = match &config.media {
            Some(media_config) => Some(Arc::new(CloudinaryMediaStore::new(media_config.clone()))),
            None => {
                tracing::warn!("Media store not configured; image uploads are disabled");
                None
            }
        };

        tracing::info!("Application state initialized");

        Ok(Self {
            users: Arc::new(PostgresUserRepository::new(db.conn.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.conn.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.conn)),
            media,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,

    #[error(transparent)]
    Database(#[from] quill_infra::database::DbErr),
}
