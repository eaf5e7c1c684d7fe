//! Router-level tests for the four pipeline endpoints.
//!
//! No network: these exercise request validation and index lifecycle errors,
//! which all resolve before any Gemini call is made.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use api::config::Config;
use api::llm_client::GeminiClient;
use api::routes::build_router;
use api::state::AppState;

fn test_router(dir: &tempfile::TempDir) -> Router {
    let config = Config {
        google_api_key: "test-key".to_string(),
        port: 0,
        upload_dir: dir.path().join("uploads"),
        vector_dir: dir.path().join("vector-store"),
        rust_log: "info".to_string(),
    };
    std::fs::create_dir_all(&config.upload_dir).unwrap();
    std::fs::create_dir_all(&config.vector_dir).unwrap();
    build_router(AppState::new(GeminiClient::new("test-key".to_string()), config))
}

fn json_post(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(&dir)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn parse_without_file_path_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(&dir)
        .oneshot(json_post("/parseResume", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn parse_with_blank_file_path_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(&dir)
        .oneshot(json_post("/parseResume", r#"{"filePath": "  "}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn parse_with_unreadable_file_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(&dir)
        .oneshot(json_post(
            "/parseResume",
            r#"{"filePath": "./does-not-exist.pdf"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn build_without_parsed_text_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(&dir)
        .oneshot(json_post("/buildVectorDb", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_without_job_description_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(&dir)
        .oneshot(json_post("/analyzeResume", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_before_any_build_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(&dir)
        .oneshot(json_post(
            "/analyzeResume",
            r#"{"jobDescription": "Senior Backend Engineer, Go, Kubernetes"}"#,
        ))
        .await
        .unwrap();
    // Index has never been built; fails before any provider call.
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn upload_with_no_parts_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/uploadResume")
        .header(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=test-boundary",
        )
        .body(Body::from("--test-boundary--\r\n"))
        .unwrap();
    let response = test_router(&dir).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_with_wrong_field_name_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let body = concat!(
        "--test-boundary\r\n",
        "Content-Disposition: form-data; name=\"attachment\"; filename=\"cv.pdf\"\r\n",
        "Content-Type: application/pdf\r\n",
        "\r\n",
        "%PDF-1.4 fake\r\n",
        "--test-boundary--\r\n",
    );
    let request = Request::builder()
        .method("POST")
        .uri("/uploadResume")
        .header(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=test-boundary",
        )
        .body(Body::from(body))
        .unwrap();
    let response = test_router(&dir).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_writes_file_and_returns_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let body = concat!(
        "--test-boundary\r\n",
        "Content-Disposition: form-data; name=\"file\"; filename=\"resume.pdf\"\r\n",
        "Content-Type: application/pdf\r\n",
        "\r\n",
        "%PDF-1.4 fake resume bytes\r\n",
        "--test-boundary--\r\n",
    );
    let request = Request::builder()
        .method("POST")
        .uri("/uploadResume")
        .header(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=test-boundary",
        )
        .body(Body::from(body))
        .unwrap();
    let response = test_router(&dir).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(payload["message"], "File uploaded successfully");
    assert_eq!(payload["fileName"], "resume.pdf");
    let file_path = payload["filePath"].as_str().unwrap();
    assert!(file_path.ends_with("-resume.pdf"));
    assert!(std::path::Path::new(file_path).exists());
}
