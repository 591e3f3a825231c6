//! Integration tests for the portal router.

use std::fs;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::api::{AppState, Config, create_router};

/// Portal root with docs, page shells and one active project.
fn fixture() -> TempDir {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let root = tmp.path();
    fs::create_dir_all(root.join("docs/guides")).unwrap();
    fs::create_dir_all(root.join("web/data")).unwrap();
    fs::write(root.join("docs/ROADMAP.md"), "# Roadmap\n\n- **Q1** ship it\n").unwrap();
    fs::write(root.join("docs/guides/setup.md"), "Intro\n\n# Setup Guide\n").unwrap();
    fs::write(root.join("docs/guides/notes.txt"), "plain").unwrap();
    fs::write(root.join("web/index.html"), "<html>dashboard</html>").unwrap();
    fs::write(root.join("web/data/stats.json"), r#"{"commits": 42}"#).unwrap();
    fs::write(root.join("README.txt"), "static file").unwrap();
    tmp
}

fn test_app(tmp: &TempDir) -> axum::Router {
    let state = AppState::new(Config::default().with_root(tmp.path()));
    create_router(state)
}

/// Fixture plus an app whose active project `alpha` exists.
async fn app_with_project() -> (TempDir, axum::Router) {
    let tmp = fixture();
    let app = test_app(&tmp);
    let response = post_json(&app, "/api/projects", json!({"name": "Alpha"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = post_json(&app, "/api/projects/select", json!({"projectId": "alpha"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    (tmp, app)
}

async fn get(app: &axum::Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post_raw(app: &axum::Router, uri: &str, body: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post_json(app: &axum::Router, uri: &str, body: Value) -> axum::response::Response {
    post_raw(app, uri, &body.to_string()).await
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn text_body(response: axum::response::Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

fn column_ids(board: &Value, column: &str) -> Vec<String> {
    board["columns"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == column)
        .unwrap()["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Pages and docs
// =============================================================================

#[tokio::test]
async fn dashboard_serves_page_shell() {
    let tmp = fixture();
    let response = get(&test_app(&tmp), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text_body(response).await.contains("dashboard"));
}

#[tokio::test]
async fn missing_page_shell_is_not_found() {
    let tmp = fixture();
    let response = get(&test_app(&tmp), "/features").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn doc_page_renders_with_title() {
    let tmp = fixture();
    let response = get(&test_app(&tmp), "/docs/ROADMAP.md").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = text_body(response).await;
    assert!(html.contains("<title>Roadmap - Shebang!</title>"));
    assert!(html.contains("<h1>Roadmap</h1>"));
    assert!(html.contains("<li><strong>Q1</strong> ship it</li>"));
    assert!(html.contains(r#"<a href="/docs">Docs</a> / ROADMAP.md"#));
}

#[tokio::test]
async fn nested_doc_has_breadcrumb() {
    let tmp = fixture();
    let response = get(&test_app(&tmp), "/docs/guides/setup.md").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = text_body(response).await;
    assert!(html.contains("<title>Setup Guide - Shebang!</title>"));
    assert!(html.contains(r#"<a href="/docs/guides">guides</a> / setup.md"#));
}

#[tokio::test]
async fn missing_doc_is_not_found() {
    let tmp = fixture();
    let app = test_app(&tmp);
    assert_eq!(get(&app, "/docs/nonexistent.md").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/docs/guides/notes.txt").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/docs/../README.txt").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn docs_index_groups_documents() {
    let tmp = fixture();
    let response = get(&test_app(&tmp), "/docs").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = text_body(response).await;
    assert!(html.contains("<h2>Core</h2>"));
    assert!(html.contains("<h2>Guides</h2>"));
    assert!(html.contains(r#"<li><a href="/docs/ROADMAP.md">Roadmap</a></li>"#));
    assert!(html.contains(r#"<li><a href="/docs/guides/setup.md">Setup</a></li>"#));
    assert!(html.find("<h2>Core</h2>").unwrap() < html.find("<h2>Guides</h2>").unwrap());
}

// =============================================================================
// Static files and data
// =============================================================================

#[tokio::test]
async fn data_json_has_cors_headers() {
    let tmp = fixture();
    let response = get(&test_app(&tmp), "/web/data/stats.json").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    assert_eq!(json_body(response).await["commits"], 42);
}

#[tokio::test]
async fn missing_data_json_is_not_found() {
    let tmp = fixture();
    let response = get(&test_app(&tmp), "/web/data/nope.json").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn static_fallback_serves_root_files() {
    let tmp = fixture();
    let app = test_app(&tmp);

    let response = get(&app, "/README.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "static file");

    assert_eq!(get(&app, "/nothing/here.css").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_outside_api_is_method_not_allowed() {
    let tmp = fixture();
    let response = post_raw(&test_app(&tmp), "/README.txt", "{}").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// API
// =============================================================================

#[tokio::test]
async fn unknown_api_path_is_not_found() {
    let tmp = fixture();
    let app = test_app(&tmp);

    let response = get(&app, "/api/unknown").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "API endpoint not found");

    let response = post_json(&app, "/api/kanban/archive", json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_method_on_api_path_is_rejected() {
    let tmp = fixture();
    let response = post_json(&test_app(&tmp), "/api/kanban", json!({})).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn board_of_missing_project_is_not_found() {
    let tmp = fixture();
    let response = get(&test_app(&tmp), "/api/kanban").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn list_projects_reports_active() {
    let (_tmp, app) = app_with_project().await;

    let response = get(&app, "/api/projects").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );

    let body = json_body(response).await;
    assert_eq!(body["active"], "alpha");
    assert_eq!(body["projects"][0]["id"], "alpha");
    assert_eq!(body["projects"][0]["name"], "Alpha");
}

#[tokio::test]
async fn create_project_returns_slug() {
    let tmp = fixture();
    let app = test_app(&tmp);

    let response = post_json(&app, "/api/projects", json!({"name": "My Cool App!!"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["projectId"], "my-cool-app");

    let response = post_json(&app, "/api/projects", json!({"name": "my cool app"})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_project_requires_name() {
    let tmp = fixture();
    let response = post_json(&test_app(&tmp), "/api/projects", json!({"name": "  "})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn select_unknown_project_is_not_found() {
    let tmp = fixture();
    let response = post_json(
        &test_app(&tmp),
        "/api/projects/select",
        json!({"projectId": "ghost"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (_tmp, app) = app_with_project().await;
    let response = post_raw(&app, "/api/kanban/task", "{ not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn add_task_defaults_to_backlog() {
    let (_tmp, app) = app_with_project().await;

    let response = post_json(&app, "/api/kanban/task", json!({"id": "t1", "title": "Write docs"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["task"]["id"], "t1");
    assert_eq!(body["task"]["category"], "feature");
    assert!(body["task"]["created"].is_string());

    let board = json_body(get(&app, "/api/kanban").await).await;
    assert_eq!(column_ids(&board, "backlog"), vec!["t1"]);
    for column in ["in_progress", "review", "done"] {
        assert!(column_ids(&board, column).is_empty());
    }
}

#[tokio::test]
async fn add_task_with_empty_body_uses_defaults() {
    let (_tmp, app) = app_with_project().await;

    let response = post_raw(&app, "/api/kanban/task", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["task"]["title"], "New Task");
    assert!(body["task"]["id"].as_str().unwrap().starts_with("task-"));
}

#[tokio::test]
async fn add_task_to_unknown_column_is_rejected() {
    let (_tmp, app) = app_with_project().await;

    let response = post_json(&app, "/api/kanban/task", json!({"id": "t1", "column": "icebox"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let board = json_body(get(&app, "/api/kanban").await).await;
    assert!(column_ids(&board, "backlog").is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_add_requests_all_land() {
    let (_tmp, app) = app_with_project().await;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                post_json(&app, "/api/kanban/task", json!({"id": format!("t{}", i)}))
                    .await
                    .status()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    let board = json_body(get(&app, "/api/kanban").await).await;
    let mut ids = column_ids(&board, "backlog");
    ids.sort();
    let expected: Vec<String> = (0..8).map(|i| format!("t{}", i)).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn move_task_between_columns() {
    let (_tmp, app) = app_with_project().await;
    post_json(&app, "/api/kanban/task", json!({"id": "t1", "title": "Ship"})).await;
    let before = json_body(get(&app, "/api/kanban").await).await;

    let response = post_json(
        &app,
        "/api/kanban/move",
        json!({"taskId": "t1", "targetColumn": "done"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["success"], true);

    let after = json_body(get(&app, "/api/kanban").await).await;
    assert!(column_ids(&after, "backlog").is_empty());
    assert_eq!(column_ids(&after, "done"), vec!["t1"]);
    assert_eq!(after["columns"][3]["tasks"][0]["title"], "Ship");
    assert!(after["lastUpdated"].as_str().unwrap() >= before["lastUpdated"].as_str().unwrap());
}

#[tokio::test]
async fn move_task_errors() {
    let (_tmp, app) = app_with_project().await;
    post_json(&app, "/api/kanban/task", json!({"id": "t1"})).await;

    let response = post_json(&app, "/api/kanban/move", json!({"taskId": "t1"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app,
        "/api/kanban/move",
        json!({"taskId": "ghost", "targetColumn": "done"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(
        &app,
        "/api/kanban/move",
        json!({"taskId": "t1", "targetColumn": "archive"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let board = json_body(get(&app, "/api/kanban").await).await;
    assert_eq!(column_ids(&board, "backlog"), vec!["t1"]);
}

#[tokio::test]
async fn update_task_changes_only_title() {
    let (_tmp, app) = app_with_project().await;
    let created = json_body(
        post_json(&app, "/api/kanban/task", json!({"id": "t1", "description": "keep me"})).await,
    )
    .await;

    let response = post_json(
        &app,
        "/api/kanban/update",
        json!({"taskId": "t1", "updates": {"title": "X"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let task = &body["task"];
    assert_eq!(task["title"], "X");
    assert_eq!(task["id"], "t1");
    assert_eq!(task["description"], "keep me");
    assert_eq!(task["created"], created["task"]["created"]);
}

#[tokio::test]
async fn update_task_rejects_id_change() {
    let (_tmp, app) = app_with_project().await;
    post_json(&app, "/api/kanban/task", json!({"id": "t1"})).await;

    let response = post_json(
        &app,
        "/api/kanban/update",
        json!({"taskId": "t1", "updates": {"id": "t2"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app,
        "/api/kanban/update",
        json!({"taskId": "missing", "updates": {"title": "X"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn explicit_project_overrides_active() {
    let (_tmp, app) = app_with_project().await;
    post_json(&app, "/api/projects", json!({"name": "Beta"})).await;

    let response = post_json(&app, "/api/kanban/task?project=beta", json!({"id": "b1"})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let beta = json_body(get(&app, "/api/kanban?project=beta").await).await;
    assert_eq!(column_ids(&beta, "backlog"), vec!["b1"]);
    let alpha = json_body(get(&app, "/api/kanban").await).await;
    assert!(column_ids(&alpha, "backlog").is_empty());
}

#[tokio::test]
async fn metrics_of_active_project() {
    let (_tmp, app) = app_with_project().await;

    let response = get(&app, "/api/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    let metrics = json_body(response).await;
    assert_eq!(metrics["timeline"]["activeHours"], 0);
}

#[tokio::test]
async fn active_project_survives_restart() {
    let (tmp, _app) = app_with_project().await;

    let restarted = test_app(&tmp);
    let body = json_body(get(&restarted, "/api/projects").await).await;
    assert_eq!(body["active"], "alpha");
}
