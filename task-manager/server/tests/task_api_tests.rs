use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use insta::assert_yaml_snapshot;
use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase};
use std::sync::Arc;
use task_manager_server::task::TaskState;
use task_manager_server::task::api::v1::create_api_router;
use tower::ServiceExt;

mod common;

use common::{JsonResponseSnapshot, body_json};

fn create_test_router(db: DatabaseConnection) -> axum::Router {
    create_api_router(Arc::new(TaskState { db: Arc::new(db) }))
}

fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create_task(app: &axum::Router, title: &str, description: &str) -> i64 {
    let body = serde_json::json!({ "title": title, "description": description }).to_string();
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/task/new", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["body"]["newTask"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn can_add_new_task() {
    let db = common::setup_sqlite_db().await.unwrap();
    let app = create_test_router(db);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/task/new",
            r#"{"title":"Buy milk","description":"2%"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["statusCode"], 201);
    assert_eq!(json["message"], "Successfully new task added");
    let new_task = &json["body"]["newTask"];
    assert_eq!(new_task["title"], "Buy milk");
    assert_eq!(new_task["description"], "2%");
    assert_eq!(new_task["status"], "NOT_DONE");
    assert!(new_task["id"].is_i64());
    assert!(new_task["createdAt"].is_string());
    assert!(new_task["updatedAt"].is_string());
}

#[tokio::test]
async fn rejects_empty_title() {
    let db = common::setup_sqlite_db().await.unwrap();
    let app = create_test_router(db);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/task/new",
            r#"{"title":"","description":"2%"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "title should not be empty");
    assert_eq!(json["error"], "Bad Request");
    assert_eq!(json["statusCode"], 400);
}

#[tokio::test]
async fn rejects_empty_description() {
    let db = common::setup_sqlite_db().await.unwrap();
    let app = create_test_router(db);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/task/new",
            r#"{"title":"Buy milk","description":""}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "description should not be empty");
}

#[tokio::test]
async fn rejects_missing_fields() {
    let db = common::setup_sqlite_db().await.unwrap();
    let app = create_test_router(db);

    let response = app
        .oneshot(json_request(Method::POST, "/task/new", r#"{"title":"Buy milk"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["statusCode"], 400);
}

#[tokio::test]
async fn can_complete_task() {
    let db = common::setup_sqlite_db().await.unwrap();
    let app = create_test_router(db);
    let id = create_task(&app, "Buy milk", "2%").await;

    let response = app
        .oneshot(empty_request(
            Method::PATCH,
            &format!("/task/complete-task/{}", id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["statusCode"], 200);
    assert_eq!(
        json["message"],
        format!("Successfully updated task status {} as complete", id)
    );
    assert_eq!(json["body"], serde_json::json!({}));
}

#[tokio::test]
async fn cannot_complete_task_twice() {
    let db = common::setup_sqlite_db().await.unwrap();
    let app = create_test_router(db);
    let id = create_task(&app, "Buy milk", "2%").await;
    let uri = format!("/task/complete-task/{}", id);

    let first = app
        .clone()
        .oneshot(empty_request(Method::PATCH, &uri))
        .await
        .unwrap();
    let second = app
        .oneshot(empty_request(Method::PATCH, &uri))
        .await
        .unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn returns_not_found_for_unknown_task() {
    let db = common::setup_sqlite_db().await.unwrap();
    let app = create_test_router(db);

    let response = app
        .oneshot(empty_request(Method::PATCH, "/task/complete-task/42"))
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let snapshot = JsonResponseSnapshot::new(&body, status, &headers, "complete_unknown_task");
    insta::with_settings!({ sort_maps => true }, {
        assert_yaml_snapshot!(snapshot);
    });
}

#[tokio::test]
async fn rejects_non_integer_id() {
    let db = common::setup_sqlite_db().await.unwrap();
    let app = create_test_router(db);

    let response = app
        .oneshot(empty_request(Method::PATCH, "/task/complete-task/abc"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Bad Request");
    assert_eq!(json["statusCode"], 400);
}

#[tokio::test]
async fn lists_recent_pending_tasks_newest_first() {
    let db = common::setup_sqlite_db().await.unwrap();
    let app = create_test_router(db);
    for n in 1..=6 {
        create_task(&app, &format!("Task {}", n), "description").await;
    }

    let response = app
        .oneshot(empty_request(Method::GET, "/task/recent-tasks"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["statusCode"], 200);
    let titles: Vec<&str> = json["body"]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Task 6", "Task 5", "Task 4", "Task 3", "Task 2"]);
}

#[tokio::test]
async fn hides_database_errors_behind_generic_message() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("password authentication failed".to_string())])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(empty_request(Method::GET, "/task/recent-tasks"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Something went wrong");
    assert_eq!(json["error"], "Internal Server Error");
    assert_eq!(json["statusCode"], 500);
    assert!(!json.to_string().contains("password"));
}
