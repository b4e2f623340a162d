use crate::api::{ApiError, Todo, TodoApi};
use crate::state::AppState;

const FETCH_TODOS_ERROR: &str = "Failed to fetch todos. Please try again later.";
const ADD_TODO_ERROR: &str = "Failed to add todo. Please try again.";
const UPDATE_TODO_ERROR: &str = "Failed to update todo. Please try again.";
const DELETE_TODO_ERROR: &str = "Failed to delete todo. Please try again.";

/// A todo session: one API binding plus the cached collection state.
///
/// Failures are never fatal. Every flow ends with the loading flag
/// cleared, and the cache only changes on confirmed server responses.
pub struct TodoApp {
    api: TodoApi,
    state: AppState,
}

impl TodoApp {
    pub fn new(api: TodoApi) -> Self {
        Self {
            api,
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Reloads the whole collection from the server.
    pub async fn refresh(&mut self) {
        self.state.begin_request();
        match self.api.list().await {
            Ok(todos) => self.state.finish_load(todos),
            Err(err) => self.fail(FETCH_TODOS_ERROR, err),
        }
    }

    /// Submits the compose form: updates the item under edit, or creates
    /// a new one when nothing is being edited.
    ///
    /// Blank titles are ignored without a request. The editing marker
    /// clears on success and failure alike.
    pub async fn submit(&mut self, title: &str, is_complete: bool) {
        if title.trim().is_empty() {
            return;
        }
        self.state.begin_request();
        match self.state.editing().cloned() {
            Some(editing) => {
                let payload = Todo {
                    id: editing.id,
                    title: title.to_string(),
                    is_complete,
                };
                match self.api.update(&payload).await {
                    Ok(updated) => self.state.finish_update(updated),
                    Err(err) => self.fail(UPDATE_TODO_ERROR, err),
                }
                self.state.cancel_editing();
            }
            None => match self.api.create(title).await {
                Ok(created) => self.state.finish_create(created),
                Err(err) => self.fail(ADD_TODO_ERROR, err),
            },
        }
    }

    /// Inverts the completion state of a cached item on the server.
    ///
    /// Ids that are not cached are ignored.
    pub async fn toggle(&mut self, id: i32) {
        self.state.begin_request();
        let Some(current) = self.state.find_todo(id).cloned() else {
            self.state.clear_loading();
            return;
        };
        let payload = Todo {
            is_complete: !current.is_complete,
            ..current
        };
        match self.api.update(&payload).await {
            Ok(updated) => self.state.finish_update(updated),
            Err(err) => self.fail(UPDATE_TODO_ERROR, err),
        }
    }

    /// Deletes an item on the server and drops it from the cache.
    pub async fn delete(&mut self, id: i32) {
        self.state.begin_request();
        match self.api.delete(id).await {
            Ok(()) => self.state.finish_delete(id),
            Err(err) => self.fail(DELETE_TODO_ERROR, err),
        }
    }

    /// Marks a cached item as under edit, pre-filling the compose form.
    ///
    /// Returns false when the id is not cached.
    pub fn edit(&mut self, id: i32) -> bool {
        self.state.start_editing(id)
    }

    pub fn cancel(&mut self) {
        self.state.cancel_editing();
    }

    pub fn set_show_completed(&mut self, show: bool) {
        self.state.set_show_completed(show);
    }

    fn fail(&mut self, message: &str, err: ApiError) {
        tracing::error!("{} ({})", message, err);
        self.state.fail(message);
    }
}
