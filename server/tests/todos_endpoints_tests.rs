mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode, header};
use serde_json::{Value, json};
use todo_server::config::Config;
use todo_server::storage::TodoRepository;
use todo_server::web::create_app;
use tower::ServiceExt;

use crate::common::{setup_memory_repository, setup_sqlite_repository};

fn setup_app(repository: Arc<dyn TodoRepository>) -> Router {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let config = Config {
        database_url: None,
        port: 8080,
        cors_origins: None,
    };
    create_app(repository, &config)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let request = match body {
        Some(json_body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn read_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn can_list_todos_when_store_is_empty() {
    let app = setup_app(setup_memory_repository());

    let response = send(&app, Method::GET, "/api/todos", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!([]));
}

#[tokio::test]
async fn can_create_todo() {
    let app = setup_app(setup_memory_repository());

    let response = send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Buy milk"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/api/todos/1")
    );
    assert_eq!(
        read_json(response).await,
        json!({"id": 1, "title": "Buy milk", "isComplete": false})
    );
}

#[tokio::test]
async fn can_get_todo_after_creating_it() {
    let app = setup_app(setup_memory_repository());

    let created = send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Buy milk", "isComplete": true})),
    )
    .await;
    let location = created.headers()[header::LOCATION].to_str().unwrap().to_string();
    let created_body = read_json(created).await;

    let response = send(&app, Method::GET, &location, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, created_body);
}

#[tokio::test]
async fn create_assigns_ids_in_insertion_order() {
    let app = setup_app(setup_memory_repository());

    for title in ["Buy milk", "Walk the dog", "Feed the cat"] {
        let response = send(
            &app,
            Method::POST,
            "/api/todos",
            Some(json!({"title": title})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(&app, Method::GET, "/api/todos", None).await;
    let todos = read_json(response).await;
    assert_eq!(
        todos,
        json!([
            {"id": 1, "title": "Buy milk", "isComplete": false},
            {"id": 2, "title": "Walk the dog", "isComplete": false},
            {"id": 3, "title": "Feed the cat", "isComplete": false}
        ])
    );
}

#[tokio::test]
async fn create_ignores_any_client_supplied_id() {
    let app = setup_app(setup_memory_repository());

    let response = send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"id": 999, "title": "Buy milk"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(read_json(response).await["id"], json!(1));
}

#[tokio::test]
async fn cannot_create_todo_without_title() {
    let app = setup_app(setup_memory_repository());

    let response = send(&app, Method::POST, "/api/todos", Some(json!({}))).await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn cannot_create_todo_with_blank_title() {
    let app = setup_app(setup_memory_repository());

    let response = send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "   "})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], json!("EMPTY_TITLE"));
}

#[tokio::test]
async fn creates_todo_with_trimmed_title() {
    let app = setup_app(setup_memory_repository());

    let response = send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "  Buy milk  "})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(read_json(response).await["title"], json!("Buy milk"));
}

#[tokio::test]
async fn can_update_todo() {
    let app = setup_app(setup_memory_repository());
    send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Buy milk"})),
    )
    .await;

    let response = send(
        &app,
        Method::PUT,
        "/api/todos/1",
        Some(json!({"id": 1, "title": "Buy oat milk", "isComplete": true})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await,
        json!({"id": 1, "title": "Buy oat milk", "isComplete": true})
    );

    let fetched = send(&app, Method::GET, "/api/todos/1", None).await;
    assert_eq!(
        read_json(fetched).await,
        json!({"id": 1, "title": "Buy oat milk", "isComplete": true})
    );
}

#[tokio::test]
async fn updates_todo_with_trimmed_title() {
    let app = setup_app(setup_memory_repository());
    send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Buy milk"})),
    )
    .await;

    let response = send(
        &app,
        Method::PUT,
        "/api/todos/1",
        Some(json!({"id": 1, "title": "  Buy oat milk  ", "isComplete": false})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["title"], json!("Buy oat milk"));

    let fetched = send(&app, Method::GET, "/api/todos/1", None).await;
    assert_eq!(read_json(fetched).await["title"], json!("Buy oat milk"));
}

#[tokio::test]
async fn cannot_update_todo_with_mismatched_ids() {
    let app = setup_app(setup_memory_repository());
    send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Buy milk"})),
    )
    .await;

    let response = send(
        &app,
        Method::PUT,
        "/api/todos/1",
        Some(json!({"id": 2, "title": "Hijacked", "isComplete": true})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], json!("ID_MISMATCH"));

    // Nothing was written.
    let fetched = send(&app, Method::GET, "/api/todos/1", None).await;
    assert_eq!(
        read_json(fetched).await,
        json!({"id": 1, "title": "Buy milk", "isComplete": false})
    );
}

#[tokio::test]
async fn cannot_update_missing_todo() {
    let app = setup_app(setup_memory_repository());

    let response = send(
        &app,
        Method::PUT,
        "/api/todos/42",
        Some(json!({"id": 42, "title": "Buy milk", "isComplete": false})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["error"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn cannot_update_todo_to_blank_title() {
    let app = setup_app(setup_memory_repository());
    send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Buy milk"})),
    )
    .await;

    let response = send(
        &app,
        Method::PUT,
        "/api/todos/1",
        Some(json!({"id": 1, "title": "   ", "isComplete": false})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], json!("EMPTY_TITLE"));
}

#[tokio::test]
async fn can_toggle_todo_completion_and_back() {
    let app = setup_app(setup_memory_repository());
    send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Buy milk"})),
    )
    .await;

    for expected in [true, false] {
        let response = send(
            &app,
            Method::PUT,
            "/api/todos/1",
            Some(json!({"id": 1, "title": "Buy milk", "isComplete": expected})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let fetched = send(&app, Method::GET, "/api/todos/1", None).await;
    assert_eq!(read_json(fetched).await["isComplete"], json!(false));
}

#[tokio::test]
async fn can_delete_todo() {
    let app = setup_app(setup_memory_repository());
    send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Buy milk"})),
    )
    .await;

    let response = send(&app, Method::DELETE, "/api/todos/1", None).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(body.is_empty());

    let fetched = send(&app, Method::GET, "/api/todos/1", None).await;
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cannot_delete_missing_todo() {
    let app = setup_app(setup_memory_repository());

    let response = send(&app, Method::DELETE, "/api/todos/42", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn does_not_reuse_ids_after_delete() {
    let app = setup_app(setup_memory_repository());
    send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Buy milk"})),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Walk the dog"})),
    )
    .await;
    send(&app, Method::DELETE, "/api/todos/2", None).await;

    let response = send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Feed the cat"})),
    )
    .await;

    assert_eq!(read_json(response).await["id"], json!(3));
}

#[tokio::test]
async fn rejects_non_numeric_todo_id() {
    let app = setup_app(setup_memory_repository());

    let response = send(&app, Method::GET, "/api/todos/abc", None).await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn rejects_malformed_json_body() {
    let app = setup_app(setup_memory_repository());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/todos")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn serves_openapi_document() {
    let app = setup_app(setup_memory_repository());

    let response = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let document = read_json(response).await;
    assert!(document["paths"]["/api/todos"].is_object());
    assert!(document["paths"]["/api/todos/{id}"].is_object());
}

#[tokio::test]
async fn can_manage_todos_backed_by_database() {
    let repository = setup_sqlite_repository()
        .await
        .expect("Failed to set up sqlite repository");
    let app = setup_app(repository);

    let created = send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Buy milk"})),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let id = read_json(created).await["id"].as_i64().unwrap();

    let updated = send(
        &app,
        Method::PUT,
        &format!("/api/todos/{}", id),
        Some(json!({"id": id, "title": "Buy oat milk", "isComplete": true})),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);

    let listed = send(&app, Method::GET, "/api/todos", None).await;
    assert_eq!(
        read_json(listed).await,
        json!([{"id": id, "title": "Buy oat milk", "isComplete": true}])
    );

    let deleted = send(&app, Method::DELETE, &format!("/api/todos/{}", id), None).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let listed = send(&app, Method::GET, "/api/todos", None).await;
    assert_eq!(read_json(listed).await, json!([]));
}
