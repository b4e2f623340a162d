use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StorageError, TodoRepository};
use crate::todo::TodoItem;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i32, TodoItem>,
    // Counts up only, so deleted ids never come back.
    last_id: i32,
}

/// Process-local todo storage backed by an ordered map.
///
/// Behaves like the database-backed repository from the caller's point of
/// view: ids start at 1 and are never reused, and writing back a deleted
/// item reports a conflict.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    table: RwLock<Table>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn add(&self, title: String, is_complete: bool) -> Result<TodoItem, StorageError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let todo = TodoItem::new(table.last_id, title, is_complete);
        table.rows.insert(todo.id(), todo.clone());
        Ok(todo)
    }

    async fn find(&self, id: i32) -> Result<Option<TodoItem>, StorageError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<TodoItem>, StorageError> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn persist(&self, todo: &TodoItem) -> Result<(), StorageError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&todo.id()) {
            return Err(StorageError::Conflict);
        }
        table.rows.insert(todo.id(), todo.clone());
        Ok(())
    }

    async fn remove(&self, todo: &TodoItem) -> Result<(), StorageError> {
        let mut table = self.table.write().await;
        table.rows.remove(&todo.id());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
