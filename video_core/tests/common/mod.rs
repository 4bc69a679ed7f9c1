#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use tempfile::TempDir;
use tower::ServiceExt;
use video_core::{create_app_with_config, AppConfig, AppState};

pub const BOUNDARY: &str = "video-vault-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub config: AppConfig,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let temp_dir = TempDir::new().unwrap();

        let mut config = AppConfig::default();
        config.storage.upload_dir = temp_dir.path().join("public").join("uploads");
        config.storage.static_dir = temp_dir.path().join("public");
        customize(&mut config);

        let state = AppState::from_config(&config);
        state.video_store.initialize().await.unwrap();

        let router = create_app_with_config(state, config.clone());

        Self { router, config, temp_dir }
    }

    pub fn upload_dir(&self) -> &std::path::Path {
        &self.config.storage.upload_dir
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.send(request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    pub async fn upload(&self, field: &str, filename: &str, content_type: &str, data: &[u8]) -> (StatusCode, serde_json::Value) {
        self.send_json(upload_request(field, filename, content_type, data)).await
    }

    pub async fn list(&self) -> Vec<String> {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/videos")
            .body(Body::empty())
            .unwrap();
        let (status, json) = self.send_json(request).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_value(json).unwrap()
    }

    pub async fn delete(&self, encoded_name: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/delete/{}", encoded_name))
            .body(Body::empty())
            .unwrap();
        self.send_json(request).await
    }
}

pub fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field, filename, content_type, data)))
        .unwrap()
}

pub fn dir_entries(path: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
