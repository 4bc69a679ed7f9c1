//! Application error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::response::ApiResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to write file: {0}")]
    WriteFailure(#[source] std::io::Error),

    #[error("Failed to delete file: {0}")]
    DeletionFailure(#[source] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidFormat(_) | AppError::InvalidFilename(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::WriteFailure(_)
            | AppError::DeletionFailure(_)
            | AppError::Storage(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            AppError::InvalidFormat(msg)
            | AppError::InvalidFilename(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg) => msg,
            AppError::WriteFailure(err) => {
                tracing::error!("Write failure: {:?}", err);
                "Failed to save uploaded file".to_string()
            }
            AppError::DeletionFailure(err) => {
                tracing::error!("Deletion failure: {:?}", err);
                "Failed to delete file".to_string()
            }
            AppError::Storage(err) => {
                tracing::error!("Storage error: {:?}", err);
                "Internal server error".to_string()
            }
            AppError::Other(err) => {
                tracing::error!("Unexpected error: {:?}", err);
                "Internal server error".to_string()
            }
        };

        (status, Json(ApiResponse::error(message))).into_response()
    }
}
