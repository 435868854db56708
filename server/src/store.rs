//! In-memory todo storage.
//!
//! # Design
//! `TodoStore` is a plain synchronous collection keyed by id. It knows nothing
//! about HTTP or validation; handlers merge and validate before calling
//! `set`. Sharing across requests goes through the `Db` handle, which wraps
//! the store in an async `RwLock` built once at startup.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Shared handle passed to every handler through axum `State`.
pub type Db = Arc<RwLock<TodoStore>>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: String,
}

/// Todo records in insertion order.
#[derive(Debug, Default)]
pub struct TodoStore {
    todos: IndexMap<String, Todo>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the two sample todos every process starts with.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let created_at = iso_timestamp(now);
        let mut store = Self::new();
        for (id, title, completed) in [
            ("todo_1", "Learn Rust", false),
            ("todo_2", "Try out the todo API", true),
        ] {
            store.set(
                id.to_string(),
                Todo {
                    id: id.to_string(),
                    title: title.to_string(),
                    completed,
                    created_at: created_at.clone(),
                },
            );
        }
        store
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.get(id)
    }

    /// Snapshot of every todo at call time.
    pub fn get_all(&self) -> Vec<Todo> {
        self.todos.values().cloned().collect()
    }

    /// Insert or fully replace the record at `id`. A replaced record keeps
    /// its original position.
    pub fn set(&mut self, id: String, todo: Todo) {
        debug_assert_eq!(id, todo.id);
        self.todos.insert(id, todo);
    }

    /// Remove the record at `id`. Absent ids are ignored.
    pub fn delete(&mut self, id: &str) {
        self.todos.shift_remove(id);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.todos.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Timestamp-derived id that is not yet taken.
    ///
    /// Two creations inside the same millisecond would collide, so the
    /// millisecond is bumped until the token is free.
    pub fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        loop {
            let id = format!("todo_{millis}");
            if !self.contains(&id) {
                return id;
            }
            millis += 1;
        }
    }
}

/// ISO-8601 UTC timestamp with millisecond precision, e.g.
/// `2024-05-01T12:00:00.000Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
