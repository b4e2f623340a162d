use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryOrder, Schema,
};

use super::{StorageError, TodoRepository};
use crate::entities::todo;
use crate::todo::TodoItem;

/// Todo storage backed by a relational database.
pub struct DbTodoRepository {
    db: DatabaseConnection,
}

impl DbTodoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<todo::Model> for TodoItem {
    fn from(model: todo::Model) -> Self {
        TodoItem::new(model.id, model.title, model.is_complete)
    }
}

/// Creates the todos table if it is not there yet.
///
/// The service owns this table outright, so a create-if-absent bootstrap
/// at connect time stands in for a migration history.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(todo::Entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}

fn backend_error(err: DbErr) -> StorageError {
    StorageError::Backend(err.into())
}

#[async_trait]
impl TodoRepository for DbTodoRepository {
    async fn add(&self, title: String, is_complete: bool) -> Result<TodoItem, StorageError> {
        let active_model = todo::ActiveModel {
            title: ActiveValue::Set(title),
            is_complete: ActiveValue::Set(is_complete),
            ..Default::default()
        };
        let created_model = active_model
            .insert(&self.db)
            .await
            .map_err(backend_error)?;
        Ok(TodoItem::from(created_model))
    }

    async fn find(&self, id: i32) -> Result<Option<TodoItem>, StorageError> {
        let model = todo::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(backend_error)?;
        Ok(model.map(TodoItem::from))
    }

    async fn list(&self) -> Result<Vec<TodoItem>, StorageError> {
        let todos = todo::Entity::find()
            .order_by_asc(todo::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend_error)?
            .into_iter()
            .map(TodoItem::from)
            .collect();
        Ok(todos)
    }

    async fn persist(&self, item: &TodoItem) -> Result<(), StorageError> {
        let active_model = todo::ActiveModel {
            id: ActiveValue::Unchanged(item.id()),
            title: ActiveValue::Set(item.title().to_string()),
            is_complete: ActiveValue::Set(item.is_complete()),
        };
        match active_model.update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(StorageError::Conflict),
            Err(err) => Err(backend_error(err)),
        }
    }

    async fn remove(&self, item: &TodoItem) -> Result<(), StorageError> {
        todo::Entity::delete_by_id(item.id())
            .exec(&self.db)
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.db.ping().await.map_err(backend_error)
    }
}
