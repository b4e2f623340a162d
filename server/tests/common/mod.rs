use std::sync::Arc;

use sea_orm::{ConnectOptions, Database};
use todo_server::storage::database::{DbTodoRepository, ensure_schema};
use todo_server::storage::{InMemoryTodoRepository, TodoRepository};

pub fn setup_memory_repository() -> Arc<dyn TodoRepository> {
    Arc::new(InMemoryTodoRepository::new())
}

/// Connects a private in-process SQLite database and creates the schema.
///
/// The pool is capped at one connection; every pooled connection to
/// `sqlite::memory:` would otherwise get its own empty database.
pub async fn setup_sqlite_repository() -> anyhow::Result<Arc<dyn TodoRepository>> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await?;
    ensure_schema(&db).await?;
    Ok(Arc::new(DbTodoRepository::new(db)))
}
