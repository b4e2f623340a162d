use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::TodoRepository;
use crate::todo::{TodoItem, TodoService, TodoServiceError};

/// Shared state for the todo API handlers.
#[derive(Clone)]
pub struct TodoState {
    pub repository: Arc<dyn TodoRepository>,
}

/// JSON representation of a todo item for API requests and responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoJson {
    /// Unique identifier of the item
    id: i32,
    /// What there is to do
    title: String,
    /// Whether the item is done
    is_complete: bool,
}

impl From<TodoItem> for TodoJson {
    fn from(todo: TodoItem) -> Self {
        Self {
            id: todo.id(),
            title: todo.title().to_string(),
            is_complete: todo.is_complete(),
        }
    }
}

/// JSON request payload for creating a todo item.
///
/// Any id sent by the client is ignored; the store assigns one.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    /// What there is to do
    title: String,
    /// Whether the item starts out done
    #[serde(default)]
    is_complete: bool,
}

/// JSON response for API errors.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Error type for todo API handlers, mapping service errors onto statuses.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct TodoApiError(#[from] TodoServiceError);

impl IntoResponse for TodoApiError {
    fn into_response(self) -> Response {
        let (status_code, error_code) = match &self.0 {
            TodoServiceError::TodoNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            TodoServiceError::IdMismatch { .. } => (StatusCode::BAD_REQUEST, "ID_MISMATCH"),
            TodoServiceError::EmptyTitle => (StatusCode::BAD_REQUEST, "EMPTY_TITLE"),
            TodoServiceError::Storage(err) => {
                tracing::error!("Storage failure while handling todo request: {}", err);
                let body = ErrorResponse {
                    error: "INTERNAL_ERROR".to_string(),
                    message: "An unexpected error occurred while processing your request. \
                              Please try again later."
                        .to_string(),
                };
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };
        let body = ErrorResponse {
            error: error_code.to_string(),
            message: self.0.to_string(),
        };
        (status_code, Json(body)).into_response()
    }
}

/// Handler for GET /api/todos - Returns every todo item.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/todos",
    responses(
        (status = 200, description = "Successfully retrieved todo items", body = [TodoJson]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn list_todos_handler(
    State(state): State<Arc<TodoState>>,
) -> Result<Json<Vec<TodoJson>>, TodoApiError> {
    let service = TodoService::new(state.repository.as_ref());
    let todos = service.get_all_todos().await?;
    Ok(Json(todos.into_iter().map(TodoJson::from).collect()))
}

/// Handler for GET /api/todos/{id} - Returns a single todo item.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    params(("id" = i32, Path, description = "Id of the todo item")),
    responses(
        (status = 200, description = "Successfully retrieved the todo item", body = TodoJson),
        (status = 404, description = "No todo item with this id", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn get_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<i32>,
) -> Result<Json<TodoJson>, TodoApiError> {
    let service = TodoService::new(state.repository.as_ref());
    let todo = service.get_todo_by_id(id).await?;
    Ok(Json(TodoJson::from(todo)))
}

/// Handler for POST /api/todos - Creates a todo item.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo item created", body = TodoJson,
            headers(("Location" = String, description = "Path of the created todo item"))),
        (status = 400, description = "Title is empty", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn create_todo_handler(
    State(state): State<Arc<TodoState>>,
    Json(payload): Json<CreateTodoRequest>,
) -> Result<impl IntoResponse, TodoApiError> {
    let service = TodoService::new(state.repository.as_ref());
    let created = service
        .create_todo(&payload.title, payload.is_complete)
        .await?;
    let location = format!("/api/todos/{}", created.id());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TodoJson::from(created)),
    ))
}

/// Handler for PUT /api/todos/{id} - Replaces a todo item's title and state.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    params(("id" = i32, Path, description = "Id of the todo item")),
    request_body = TodoJson,
    responses(
        (status = 200, description = "Todo item updated", body = TodoJson),
        (status = 400, description = "Ids disagree or the title is empty", body = ErrorResponse),
        (status = 404, description = "No todo item with this id", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn update_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<i32>,
    Json(payload): Json<TodoJson>,
) -> Result<Json<TodoJson>, TodoApiError> {
    let service = TodoService::new(state.repository.as_ref());
    let updated = service
        .update_todo(id, payload.id, &payload.title, payload.is_complete)
        .await?;
    Ok(Json(TodoJson::from(updated)))
}

/// Handler for DELETE /api/todos/{id} - Deletes a todo item.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(("id" = i32, Path, description = "Id of the todo item")),
    responses(
        (status = 204, description = "Todo item deleted"),
        (status = 404, description = "No todo item with this id", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn delete_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, TodoApiError> {
    let service = TodoService::new(state.repository.as_ref());
    service.delete_todo_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates and returns the todos API router.
pub fn create_todo_router(state: Arc<TodoState>) -> Router {
    Router::new()
        .route("/todos", get(list_todos_handler).post(create_todo_handler))
        .route(
            "/todos/{id}",
            get(get_todo_handler)
                .put(update_todo_handler)
                .delete(delete_todo_handler),
        )
        .with_state(state)
}
