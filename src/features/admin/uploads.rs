use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::features::extract::ApiPath;
use crate::io::{ImageUpload, StoredMedia};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
    pub mime_type: &'static str,
    pub size: usize,
    pub width: u32,
    pub height: u32,
}

/// `POST /api/admin/upload`, multipart with the image in field `file`.
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut multipart = multipart?;
    let mut data: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field.bytes().await?;
        data = Some(bytes.to_vec());
        // only the first file counts
        break;
    }

    let Some(data) = data else {
        return Err(AppError::BadRequest("no file provided".to_string()));
    };

    let image = ImageUpload::validate(data, state.config.max_upload_bytes)?;
    let url = state.media.store(&image).await?;

    tracing::info!(
        mode = %state.config.upload_mode,
        mime = image.mime_type(),
        bytes = image.bytes.len(),
        "image uploaded"
    );

    Ok(Json(UploadResponse {
        url,
        mime_type: image.mime_type(),
        size: image.bytes.len(),
        width: image.width,
        height: image.height,
    }))
}

pub async fn list_uploads_handler(State(state): State<AppState>) -> AppResult<Json<Vec<StoredMedia>>> {
    Ok(Json(state.media.list().await?))
}

pub async fn delete_upload_handler(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> AppResult<StatusCode> {
    if name.starts_with('.') || name.contains(['/', '\\']) {
        return Err(AppError::BadRequest(format!("invalid upload name {name}")));
    }
    if state.media.remove(&name).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("upload {name}")))
    }
}
