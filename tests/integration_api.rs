//! API integration tests
//!
//! Tests for HTTP API endpoints using axum's test utilities. Sessions are
//! opened with an explicit duration so no media tools are needed.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use segcut::config::Config;
use segcut::server::{create_router, AppContext};
use serde_json::{json, Value};
use tempfile::tempdir;
use tower::ServiceExt;

fn app() -> Router {
    create_router(AppContext::new(Config::default()), None)
}

/// Helper to get response body as JSON
async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_output_folder() {
    let mut config = Config::default();
    config.export.output_dir = Some("/srv/parts".into());
    let app = create_router(AppContext::new(config), None);

    let (status, json) = send(
        &app,
        Request::get("/api/output-folder").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["path"], "/srv/parts");
}

#[tokio::test]
async fn test_file_info_missing_file() {
    let (status, json) = send(
        &app(),
        post_json("/api/file-info", json!({"path": "/nonexistent/a.mp3"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "File not found");
}

#[tokio::test]
async fn test_split_validation() {
    let app = app();

    let (status, json) = send(
        &app,
        post_json("/api/split", json!({"inputFile": "/nonexistent/a.mp3"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Input file not found");

    let dir = tempdir().unwrap();
    let input = dir.path().join("in.mp3");
    std::fs::write(&input, b"x").unwrap();
    let (status, json) = send(
        &app,
        post_json("/api/split", json!({"inputFile": input, "segments": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No segments defined");
}

#[tokio::test]
async fn test_list_validation() {
    let app = app();
    let (status, _) = send(
        &app,
        post_json("/api/list-mp3-files", json!({"folderPath": "/nonexistent"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let dir = tempdir().unwrap();
    let file = dir.path().join("a.mp3");
    std::fs::write(&file, b"x").unwrap();
    let (status, json) = send(
        &app,
        post_json("/api/list-mp3-files", json!({"folderPath": file})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Path is not a directory");
}

#[tokio::test]
async fn test_join_validation() {
    let app = app();
    let (status, json) = send(
        &app,
        post_json("/api/join-mp3", json!({"filePaths": [], "outputPath": "/tmp/x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No files provided");

    let (status, json) = send(
        &app,
        post_json(
            "/api/join-mp3",
            json!({"filePaths": ["/nonexistent/a.mp3"], "outputPath": "/tmp/x"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "File not found: /nonexistent/a.mp3");
}

#[tokio::test]
async fn test_tools_endpoint() {
    let (status, json) = send(&app(), Request::get("/api/tools").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["ffmpeg", "ffprobe"]);
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = app();

    let (status, _) = send(&app, Request::get("/api/session").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send(
        &app,
        post_json("/api/session", json!({"path": "/music/talk.mp3", "duration": 125.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["baseName"], "talk");
    assert_eq!(json["segments"].as_array().unwrap().len(), 0);

    let (status, json) = send(
        &app,
        post_json("/api/session/commands", json!({"op": "generate", "length": "60"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["segments"].as_array().unwrap().len(), 3);
    assert_eq!(json["segments"][2]["outputName"], "segment_03");
    assert_eq!(json["segmentLength"], 60.0);

    let (status, json) = send(
        &app,
        post_json(
            "/api/session/commands",
            json!([
                {"op": "toggle_lock", "index": 1},
                {"op": "generate", "length": 30}
            ]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let starts: Vec<f64> = json["segments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["start"].as_f64().unwrap())
        .collect();
    assert_eq!(starts, vec![0.0, 30.0, 60.0, 120.0]);

    let (status, _) = send(
        &app,
        Request::delete("/api/session").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Request::delete("/api/session").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_rejection_is_unprocessable() {
    let app = app();
    send(
        &app,
        post_json("/api/session", json!({"duration": 125.0})),
    )
    .await;
    send(
        &app,
        post_json(
            "/api/session/commands",
            json!([{"op": "generate", "length": 60}, {"op": "toggle_lock", "index": 0}]),
        ),
    )
    .await;

    let (status, json) = send(
        &app,
        post_json(
            "/api/session/commands",
            json!({"op": "set_boundary", "index": 1, "field": "start", "value": "00:00:50"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["kind"], "boundary_conflict");
    assert_eq!(json["value"], 50.0);

    let (_, json) = send(&app, Request::get("/api/session").body(Body::empty()).unwrap()).await;
    assert_eq!(json["segments"][1]["start"], 60.0);
    assert_eq!(json["baseName"], "output");
}

#[tokio::test]
async fn test_session_commands_without_session() {
    let (status, json) = send(
        &app(),
        post_json("/api/session/commands", json!({"op": "append"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["kind"], "no_session");
}

#[tokio::test]
async fn test_open_session_requires_path_or_duration() {
    let (status, _) = send(&app(), post_json("/api/session", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_with_tiny_length_is_rejected() {
    let app = app();
    send(&app, post_json("/api/session", json!({"duration": 3600.0}))).await;

    let (status, json) = send(
        &app,
        post_json(
            "/api/session/commands",
            json!({"op": "generate", "length": 0.000001}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["kind"], "invalid_length");
    assert_eq!(json["value"], 0.000001);

    let (_, json) = send(&app, Request::get("/api/session").body(Body::empty()).unwrap()).await;
    assert_eq!(json["segments"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_shift_with_text_delta_is_noop() {
    let app = app();
    send(&app, post_json("/api/session", json!({"duration": 125.0}))).await;
    send(
        &app,
        post_json("/api/session/commands", json!({"op": "generate", "length": 60})),
    )
    .await;

    let (status, json) = send(
        &app,
        post_json(
            "/api/session/commands",
            json!({"op": "shift", "index": 1, "delta": "ten"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["segments"][1]["start"], 60.0);
}
