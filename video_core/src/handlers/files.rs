use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use tracing::info;

use crate::{
    error::{AppError, Result},
    models::ApiResponse,
    AppState,
};

/// Form field name the bundled upload page uses.
pub const UPLOAD_FIELD: &str = "videoFile";

/// Stores the first multipart field that carries a filename.
pub async fn upload_video(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse>> {
    let mut multipart = multipart.map_err(|rejection| {
        AppError::BadRequest(format!("Invalid multipart request: {}", rejection.body_text()))
    })?;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let Some(original_filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        if field.name() != Some(UPLOAD_FIELD) {
            tracing::debug!(
                "Accepting file from field {:?} instead of {:?}",
                field.name(),
                UPLOAD_FIELD
            );
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        info!("POST /upload - {} ({})", original_filename, content_type);

        let stored = state
            .video_store
            .accept_upload(&original_filename, &content_type, field)
            .await?;

        return Ok(Json(
            ApiResponse::success("File uploaded successfully!").with_filename(stored.filename),
        ));
    }

    Err(AppError::BadRequest(
        "No file uploaded or invalid format.".to_string(),
    ))
}

pub async fn list_videos(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.video_store.list_videos().await)
}

pub async fn delete_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<ApiResponse>> {
    info!("DELETE /delete/{}", filename);

    let deleted = state.video_store.delete_video(&filename).await?;

    Ok(Json(ApiResponse::success(format!("Deleted {}", deleted))))
}
