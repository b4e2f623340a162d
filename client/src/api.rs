//! Typed HTTP binding for the todo API.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Path of the todos collection on the server.
pub const TODOS_ENDPOINT: &str = "/api/todos";

/// A todo item as the API serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub is_complete: bool,
}

/// Error type for todo API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents a transport-level failure (connection, timeout, decoding).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Represents a non-success response from the server.
    #[error("server responded with status {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTodoPayload<'a> {
    title: &'a str,
    is_complete: bool,
}

/// Client for the todo API.
pub struct TodoApi {
    http: reqwest::Client,
    base_url: String,
}

impl TodoApi {
    /// Creates a client against the given base URL (scheme and authority,
    /// no trailing path).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetches the whole todo collection.
    pub async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.http.get(self.todos_url()).send().await?;
        Self::read_json(response).await
    }

    /// Fetches a single todo item by id.
    pub async fn get(&self, id: i32) -> Result<Todo, ApiError> {
        let response = self.http.get(self.todo_url(id)).send().await?;
        Self::read_json(response).await
    }

    /// Creates a todo item. New items always start out not complete.
    pub async fn create(&self, title: &str) -> Result<Todo, ApiError> {
        let payload = CreateTodoPayload {
            title,
            is_complete: false,
        };
        let response = self
            .http
            .post(self.todos_url())
            .json(&payload)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Replaces a todo item's title and completion state.
    pub async fn update(&self, todo: &Todo) -> Result<Todo, ApiError> {
        let response = self
            .http
            .put(self.todo_url(todo.id))
            .json(todo)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Deletes a todo item by id.
    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        let response = self.http.delete(self.todo_url(id)).send().await?;
        Self::require_success(response).await?;
        Ok(())
    }

    fn todos_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), TODOS_ENDPOINT)
    }

    fn todo_url(&self, id: i32) -> String {
        format!("{}/{}", self.todos_url(), id)
    }

    async fn require_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::require_success(response).await?;
        Ok(response.json().await?)
    }
}
