use crate::storage::{StorageError, TodoRepository};

pub mod api;

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct TodoItem {
    id: i32,
    title: String,
    is_complete: bool,
}

impl TodoItem {
    pub fn new(id: i32, title: String, is_complete: bool) -> Self {
        Self {
            id,
            title,
            is_complete,
        }
    }

    /// Returns the id of the item.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns the title of the item.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns whether the item is done.
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }
}

/// Error type for TodoService operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoServiceError {
    /// Represents a lookup for an id with no stored item behind it.
    #[error("Todo item with ID {0} not found")]
    TodoNotFound(i32),
    /// Represents an update whose path and payload ids disagree.
    #[error("Path ID {path} does not match payload ID {payload}")]
    IdMismatch { path: i32, payload: i32 },
    /// Represents a title that is empty once trimmed.
    #[error("Todo title must not be empty")]
    EmptyTitle,
    /// Represents a storage failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct TodoService<'a> {
    repository: &'a dyn TodoRepository,
}

impl TodoService<'_> {
    pub fn new(repository: &dyn TodoRepository) -> TodoService {
        TodoService { repository }
    }

    /// Retrieves all todo items, ordered by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_todos(&self) -> Result<Vec<TodoItem>, TodoServiceError> {
        let todos = self.repository.list().await?;
        Ok(todos)
    }

    /// Retrieves a todo item by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_todo_by_id(&self, id: i32) -> Result<TodoItem, TodoServiceError> {
        self.repository
            .find(id)
            .await?
            .ok_or(TodoServiceError::TodoNotFound(id))
    }

    /// Creates a new todo item.
    ///
    /// # Arguments
    ///
    /// * `title` - The title of the item; stored trimmed and must not be
    ///   empty.
    /// * `is_complete` - Whether the item starts out done.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `TodoItem` with its assigned id if
    /// successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_todo(
        &self,
        title: &str,
        is_complete: bool,
    ) -> Result<TodoItem, TodoServiceError> {
        let title = valid_title(title)?;
        let created = self.repository.add(title, is_complete).await?;
        Ok(created)
    }

    /// Replaces the title and completion state of an existing todo item.
    ///
    /// The path id must match the id carried in the payload; nothing is
    /// written when they disagree.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `TodoItem` if successful, or an
    /// error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update_todo(
        &self,
        path_id: i32,
        payload_id: i32,
        title: &str,
        is_complete: bool,
    ) -> Result<TodoItem, TodoServiceError> {
        if path_id != payload_id {
            return Err(TodoServiceError::IdMismatch {
                path: path_id,
                payload: payload_id,
            });
        }
        let title = valid_title(title)?;
        self.repository
            .find(path_id)
            .await?
            .ok_or(TodoServiceError::TodoNotFound(path_id))?;

        let updated = TodoItem::new(path_id, title, is_complete);
        match self.repository.persist(&updated).await {
            Ok(()) => Ok(updated),
            Err(StorageError::Conflict) => {
                // The row was there a moment ago. Gone now means a
                // concurrent delete won; anything else is a storage fault.
                if self.repository.find(path_id).await?.is_none() {
                    Err(TodoServiceError::TodoNotFound(path_id))
                } else {
                    tracing::error!(
                        "Write conflict on todo item {} which still exists",
                        path_id
                    );
                    Err(TodoServiceError::Storage(StorageError::Conflict))
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a todo item by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `TodoItem` if successful, or an
    /// error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn delete_todo_by_id(&self, id: i32) -> Result<TodoItem, TodoServiceError> {
        let todo_to_delete = self
            .repository
            .find(id)
            .await?
            .ok_or(TodoServiceError::TodoNotFound(id))?;
        self.repository.remove(&todo_to_delete).await?;
        Ok(todo_to_delete)
    }
}

fn valid_title(title: &str) -> Result<String, TodoServiceError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TodoServiceError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}
