//! Image upload handler - hands the payload to the external media store.

use actix_web::{HttpRequest, HttpResponse, http::header, web};

use quill_core::policy::{Action, Resource, decide};
use quill_core::ports::MediaError;
use quill_shared::dto::UploadResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// POST /api/uploads/image - author only, raw image body.
pub async fn image(
    state: web::Data<AppState>,
    identity: Identity,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    decide(Some(&identity.caller()), Resource::None, Action::UploadMedia).into_result()?;

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if !content_type.starts_with("image/") {
        return Err(AppError::Validation(
            "Only image files are allowed".to_string(),
        ));
    }
    if body.is_empty() {
        return Err(AppError::Validation(
            "No image file provided".to_string(),
        ));
    }
    if body.len() > MAX_IMAGE_BYTES {
        return Err(AppError::Validation(
            "File size too large. Maximum 5MB allowed.".to_string(),
        ));
    }

    let media = state.media.as_ref().ok_or(AppError::from(MediaError::NotConfigured))?;

    let stored = media.upload_image(body.to_vec(), &content_type).await?;

    tracing::info!(reference = %stored.reference, "Image uploaded");

    Ok(HttpResponse::Ok().json(UploadResponse {
        url: stored.url,
        reference: stored.reference,
    }))
}
