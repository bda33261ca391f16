//! Media store port - the external image-hosting provider.

use async_trait::async_trait;

/// What the provider hands back after an upload. The core stores both
/// fields opaquely and never inspects image bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub url: String,
    pub reference: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("media store is not configured")]
    NotConfigured,

    /// Provider-side failure. The detail is for logs only; responses never
    /// echo provider internals.
    #[error("upload failed: {0}")]
    UploadFailed(String),
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Hand an image payload to the provider and get back its public URL
    /// and provider reference.
    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredImage, MediaError>;
}
