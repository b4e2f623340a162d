//! Session state for the todo client.
//!
//! Holds the cached todo collection plus the flags a front end renders
//! from. All transitions are synchronous and free of I/O, so they can be
//! exercised without a server.

use crate::api::Todo;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AppState {
    todos: Vec<Todo>,
    loading: bool,
    error: Option<String>,
    editing: Option<Todo>,
    show_completed: bool,
}

impl AppState {
    /// Returns the cached todo items in server order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Returns whether a request is in flight.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Returns the current error banner, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the item currently under edit, if any.
    pub fn editing(&self) -> Option<&Todo> {
        self.editing.as_ref()
    }

    /// Returns whether completed items are shown.
    pub fn show_completed(&self) -> bool {
        self.show_completed
    }

    /// Returns the cached item with this id, if any.
    pub fn find_todo(&self, id: i32) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Returns the items the list view shows under the current filter.
    ///
    /// Hiding completed items is purely view-side; the cache always holds
    /// the full collection.
    pub fn visible_todos(&self) -> Vec<&Todo> {
        self.todos
            .iter()
            .filter(|todo| self.show_completed || !todo.is_complete)
            .collect()
    }

    /// Marks a request as started and clears a previous error banner.
    pub fn begin_request(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Records a failed request. The cache stays as it was.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    /// Clears the loading flag without touching anything else.
    pub fn clear_loading(&mut self) {
        self.loading = false;
    }

    /// Replaces the cache with a freshly fetched collection.
    pub fn finish_load(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
        self.loading = false;
    }

    /// Appends a newly created item to the cache.
    pub fn finish_create(&mut self, todo: Todo) {
        self.todos.push(todo);
        self.loading = false;
    }

    /// Replaces the cached entry matching the updated item's id.
    pub fn finish_update(&mut self, todo: Todo) {
        if let Some(existing) = self.todos.iter_mut().find(|t| t.id == todo.id) {
            *existing = todo;
        }
        self.loading = false;
    }

    /// Drops an item from the cache after a confirmed delete.
    pub fn finish_delete(&mut self, id: i32) {
        self.todos.retain(|todo| todo.id != id);
        self.loading = false;
    }

    /// Starts editing the cached item with this id.
    ///
    /// Returns false when the id is not cached; the editing marker stays
    /// unchanged in that case.
    pub fn start_editing(&mut self, id: i32) -> bool {
        match self.find_todo(id).cloned() {
            Some(todo) => {
                self.editing = Some(todo);
                true
            }
            None => false,
        }
    }

    /// Clears the editing marker.
    pub fn cancel_editing(&mut self) {
        self.editing = None;
    }

    /// Sets whether completed items are shown.
    pub fn set_show_completed(&mut self, show: bool) {
        self.show_completed = show;
    }
}
