use std::sync::Arc;

use crate::todo::TodoItem;

pub mod database;
pub mod memory;

pub use database::DbTodoRepository;
pub use memory::InMemoryTodoRepository;

/// Error type for todo storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The stored row changed or vanished between a lookup and the write.
    #[error("stored todo item changed or vanished during write")]
    Conflict,
    /// Represents a backend fault the caller cannot act on.
    #[error("storage backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Persistence boundary for todo items.
///
/// Both backends assign ids monotonically per store instance; an id is
/// never handed out twice, even after the item it belonged to has been
/// deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TodoRepository: Send + Sync {
    /// Stores a new item and returns it with its assigned id.
    async fn add(&self, title: String, is_complete: bool) -> Result<TodoItem, StorageError>;

    /// Looks up an item by its id.
    async fn find(&self, id: i32) -> Result<Option<TodoItem>, StorageError>;

    /// Returns all items, ordered by id.
    async fn list(&self) -> Result<Vec<TodoItem>, StorageError>;

    /// Writes back the full mutable state of an existing item.
    ///
    /// Fails with [`StorageError::Conflict`] when the row is no longer
    /// there.
    async fn persist(&self, todo: &TodoItem) -> Result<(), StorageError>;

    /// Deletes an item. Removing an item that is already gone is a no-op.
    async fn remove(&self, todo: &TodoItem) -> Result<(), StorageError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), StorageError>;
}

/// Storage backend selection, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory,
    Database { url: String },
}

impl StorageConfig {
    /// Derives the backend from the configured connection string.
    ///
    /// Absent and blank strings select the in-memory table, as do strings
    /// still carrying an unexpanded `${..}` placeholder from the
    /// deployment environment.
    pub fn from_database_url(database_url: Option<&str>) -> Self {
        match database_url {
            Some(url) if !url.trim().is_empty() && !url.contains("${") => StorageConfig::Database {
                url: url.to_string(),
            },
            _ => StorageConfig::InMemory,
        }
    }
}

/// Connects the selected backend and returns it as a shared repository.
///
/// For the relational backend this also creates the todos table if it is
/// not there yet.
pub async fn connect(config: &StorageConfig) -> anyhow::Result<Arc<dyn TodoRepository>> {
    match config {
        StorageConfig::InMemory => {
            tracing::info!("Using in-memory todo storage");
            Ok(Arc::new(InMemoryTodoRepository::new()))
        }
        StorageConfig::Database { url } => {
            let db = sea_orm::Database::connect(url.as_str()).await?;
            database::ensure_schema(&db).await?;
            tracing::info!("Connected to the todo database");
            Ok(Arc::new(DbTodoRepository::new(db)))
        }
    }
}
