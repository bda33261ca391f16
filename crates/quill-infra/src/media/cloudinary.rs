//! Cloudinary-backed media store.
//!
//! Uploads go to the provider's HTTP API as a base64 data URI with a signed
//! form body. The core only ever sees the returned `{url, reference}` pair.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use sha1::{Digest, Sha1};

use quill_core::ports::{MediaError, MediaStore, StoredImage};

const UPLOAD_FOLDER: &str = "quill";

/// Cloudinary credentials, all three required.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl CloudinaryConfig {
    /// Read credentials from the environment; `None` when any is missing,
    /// which leaves the media store unconfigured.
    pub fn from_env() -> Option<Self> {
        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME").ok()?;
        let api_key = std::env::var("CLOUDINARY_API_KEY").ok()?;
        let api_secret = std::env::var("CLOUDINARY_API_SECRET").ok()?;

        Some(Self {
            cloud_name,
            api_key,
            api_secret,
        })
    }
}

#[derive(Debug, Deserialize)]
struct UploadApiResponse {
    secure_url: String,
    public_id: String,
}

/// Media store client for the Cloudinary upload API.
pub struct CloudinaryMediaStore {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

impl CloudinaryMediaStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }

    /// Request signature: SHA-1 over the alphabetically-ordered signed
    /// params with the API secret appended.
    fn sign(&self, timestamp: i64) -> String {
        let to_sign = format!(
            "folder={}&timestamp={}{}",
            UPLOAD_FOLDER, timestamp, self.config.api_secret
        );
        let digest = Sha1::digest(to_sign.as_bytes());
        hex::encode(digest)
    }
}

#[async_trait]
impl MediaStore for CloudinaryMediaStore {
    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredImage, MediaError> {
        let data_uri = format!("data:{};base64,{}", content_type, BASE64.encode(&bytes));
        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.sign(timestamp);

        let form = [
            ("file", data_uri),
            ("api_key", self.config.api_key.clone()),
            ("timestamp", timestamp.to_string()),
            ("signature", signature),
            ("folder", UPLOAD_FOLDER.to_string()),
        ];

        let response = self
            .client
            .post(self.upload_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| MediaError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Media upload rejected by provider");
            return Err(MediaError::UploadFailed(format!(
                "provider returned {status}: {body}"
            )));
        }

        let uploaded: UploadApiResponse = response
            .json()
            .await
            .map_err(|e| MediaError::UploadFailed(e.to_string()))?;

        Ok(StoredImage {
            url: uploaded.secure_url,
            reference: uploaded.public_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_stable_for_fixed_inputs() {
        let store = CloudinaryMediaStore::new(CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        });

        // sha1("folder=quill&timestamp=1700000000secret")
        assert_eq!(store.sign(1_700_000_000), store.sign(1_700_000_000));
        assert_ne!(store.sign(1_700_000_000), store.sign(1_700_000_001));
        assert_eq!(store.sign(1_700_000_000).len(), 40);
    }

    #[test]
    fn upload_url_targets_the_configured_cloud() {
        let store = CloudinaryMediaStore::new(CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        });

        assert_eq!(
            store.upload_url(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }
}
