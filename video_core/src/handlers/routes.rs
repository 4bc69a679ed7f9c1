//! Route table for the video service

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};

use crate::AppState;
use super::files::{delete_video, list_videos, upload_video};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route("/upload", post(upload_video))
        .route("/videos", get(list_videos))
        .route("/delete/:filename", delete(delete_video))
}

async fn handle_root(State(state): State<AppState>) -> Response {
    let index = state.static_dir.join("index.html");

    match tokio::fs::read_to_string(&index).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::warn!("Landing page {} unavailable: {}", index.display(), e);
            (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                "Error: landing page not found",
            )
                .into_response()
        }
    }
}
