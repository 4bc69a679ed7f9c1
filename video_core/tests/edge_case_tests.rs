mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{dir_entries, upload_request, TestApp, BOUNDARY};

#[tokio::test]
async fn test_upload_rejects_wrong_content_type() {
    let app = TestApp::new().await;

    for content_type in ["video/webm", "text/plain", "application/octet-stream"] {
        let (status, json) = app.upload("videoFile", "clip.mp4", content_type, b"data").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", content_type);
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains(content_type));
    }

    assert!(dir_entries(app.upload_dir()).is_empty());
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = TestApp::new().await;

    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nholiday\r\n--{b}--\r\n",
        b = BOUNDARY
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, json) = app.send_json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "No file uploaded or invalid format.");
    assert!(dir_entries(app.upload_dir()).is_empty());
}

#[tokio::test]
async fn test_upload_accepts_other_field_names() {
    let app = TestApp::new().await;

    let (status, json) = app.upload("file", "clip.mp4", "video/mp4", b"data").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["filename"].as_str().unwrap().ends_with("-clip.mp4"));
}

#[tokio::test]
async fn test_upload_rejects_control_characters_in_filename() {
    let app = TestApp::new().await;

    let (status, json) = app.upload("videoFile", "clip\u{7}.mp4", "video/mp4", b"data").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(dir_entries(app.upload_dir()).is_empty());
}

#[tokio::test]
async fn test_upload_over_body_limit_leaves_nothing_behind() {
    let app = TestApp::with_config(|config| config.storage.max_upload_size_mb = 1).await;
    let data = vec![0u8; 2 * 1024 * 1024];

    let (status, _) = app.send(upload_request("videoFile", "huge.mp4", "video/mp4", &data)).await;
    assert_ne!(status, StatusCode::OK);
    assert!(dir_entries(app.upload_dir()).is_empty());
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let app = TestApp::new().await;
    std::fs::write(app.upload_dir().join("keep.mp4"), b"x").unwrap();

    let (status, json) = app.delete("missing.mp4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(dir_entries(app.upload_dir()), vec!["keep.mp4".to_string()]);
}

#[tokio::test]
async fn test_delete_traversal_never_escapes_upload_dir() {
    let app = TestApp::new().await;
    let outside = app.temp_dir.path().join("public").join("secret.mp4");
    std::fs::write(&outside, b"keep me").unwrap();

    for encoded in ["..%2Fsecret.mp4", "..%5Csecret.mp4", "..%2F..%2Fpublic%2Fsecret.mp4", ".."] {
        let (status, json) = app.delete(encoded).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", encoded);
        assert_eq!(json["success"], false);
    }

    assert!(outside.exists());
}

#[tokio::test]
async fn test_landing_page() {
    let app = TestApp::new().await;
    let request = || {
        Request::builder()
            .method(Method::GET)
            .uri("/")
            .body(Body::empty())
            .unwrap()
    };

    let (status, body) = app.send(request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(String::from_utf8(body).unwrap().starts_with("Error"));

    std::fs::write(
        app.config.storage.static_dir.join("index.html"),
        "<h1>Video Vault</h1>",
    )
    .unwrap();

    let (status, body) = app.send(request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<h1>Video Vault</h1>");
}

#[tokio::test]
async fn test_upload_non_multipart_is_json_bad_request() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"videoFile":"clip.mp4"}"#))
        .unwrap();

    let (status, json) = app.send_json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().starts_with("Invalid multipart request"));
    assert!(dir_entries(app.upload_dir()).is_empty());
}

#[tokio::test]
async fn test_truncated_multipart_is_bad_request() {
    let app = TestApp::new().await;

    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"videoFile\"; filename=\"clip.mp4\"\r\n\
         Content-Type: video/mp4\r\n\r\nhalf a video",
        b = BOUNDARY
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, json) = app.send_json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(dir_entries(app.upload_dir()).is_empty());
}

async fn app_with_blocked_upload_dir() -> TestApp {
    let app = TestApp::new().await;
    std::fs::remove_dir(app.upload_dir()).unwrap();
    std::fs::write(app.upload_dir(), b"not a directory").unwrap();
    app
}

#[tokio::test]
async fn test_upload_disk_failure_is_server_error() {
    let app = app_with_blocked_upload_dir().await;

    let (status, json) = app.upload("videoFile", "clip.mp4", "video/mp4", b"data").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Failed to save uploaded file");
    assert_eq!(std::fs::read(app.upload_dir()).unwrap(), b"not a directory");
}

#[tokio::test]
async fn test_delete_failure_is_server_error() {
    let app = app_with_blocked_upload_dir().await;

    let (status, json) = app.delete("x.mp4").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Failed to delete file");
    assert_eq!(std::fs::read(app.upload_dir()).unwrap(), b"not a directory");
}
