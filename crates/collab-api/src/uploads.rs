use axum::{
    Extension, Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use collab_core::compute_trust;
use collab_types::api::{Claims, LogoResponse};

use crate::auth::AppState;
use crate::error::ApiError;

/// 2 MB limit for logos
pub const MAX_LOGO_SIZE: usize = 2 * 1024 * 1024;

/// Multipart field carrying the image.
const LOGO_FIELD: &str = "logo";

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::FileTooLarge
    } else {
        warn!("Malformed logo upload: {}", e.body_text());
        ApiError::BadRequest("FILE_REQUIRED")
    }
}

/// POST /api/profile/me/logo: multipart upload of a png/jpeg/webp logo.
/// Stores the file under the uploads dir and points the profile at it.
pub async fn upload_logo(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<LogoResponse>, ApiError> {
    if state.store.with_doc(|doc| doc.profile(claims.sub).is_none())? {
        return Err(ApiError::not_found());
    }

    let mut multipart = multipart.map_err(|_| ApiError::BadRequest("FILE_REQUIRED"))?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(LOGO_FIELD) {
            continue;
        }
        let ext = field
            .content_type()
            .and_then(extension_for)
            .ok_or(ApiError::BadRequest("INVALID_FILE_TYPE"))?;
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some((ext, bytes));
        break;
    }

    let Some((ext, bytes)) = upload.filter(|(_, b)| !b.is_empty()) else {
        return Err(ApiError::BadRequest("FILE_REQUIRED"));
    };
    if bytes.len() > MAX_LOGO_SIZE {
        return Err(ApiError::FileTooLarge);
    }

    let now = Utc::now();
    let file_name = format!("{}_{}.{}", now.timestamp_millis(), Uuid::new_v4().simple(), ext);

    tokio::fs::create_dir_all(&state.uploads_dir).await.map_err(|e| {
        error!("Failed to create uploads directory: {}", e);
        anyhow::anyhow!("creating uploads dir: {}", e)
    })?;
    let file_path = state.uploads_dir.join(&file_name);
    tokio::fs::write(&file_path, &bytes).await.map_err(|e| {
        error!("Failed to write file {}: {}", file_path.display(), e);
        anyhow::anyhow!("writing logo: {}", e)
    })?;

    let logo_path = format!("/uploads/{}", file_name);
    let trust = state.store.with_doc_mut(|doc| {
        let profile = doc.profile_mut(claims.sub).ok_or_else(ApiError::not_found)?;
        profile.logo_path = Some(logo_path.clone());
        profile.updated_at = Some(now);
        Ok::<_, ApiError>(compute_trust(Some(profile)))
    })?;

    info!("Logo {} ({} bytes) stored for {}", file_name, bytes.len(), claims.sub);
    Ok(Json(LogoResponse { logo_path, trust }))
}
