//! Handlers for `/api/todos` and `/api/todos/{id}`.
//!
//! # Design
//! Bodies arrive as raw bytes and are parsed here, so a malformed body is
//! always reported as `Invalid JSON body` whatever the Content-Type says.
//! Field checks work on the parsed `serde_json::Value`, so an update applies
//! a field exactly when its key is present, including `"completed": false`.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::store::{iso_timestamp, Db, Todo};

const TITLE_REQUIRED: &str = "title is required and must be a string";

/// Validated fields of a create request.
#[derive(Debug, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
}

impl NewTodo {
    pub fn from_json(payload: &Value) -> Result<Self, ApiError> {
        let title = payload
            .get("title")
            .and_then(Value::as_str)
            .filter(|title| !title.is_empty())
            .ok_or_else(|| ApiError::validation(TITLE_REQUIRED))?;
        let completed = match payload.get("completed") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(completed)) => *completed,
            Some(_) => return Err(ApiError::validation("completed must be a boolean")),
        };
        Ok(Self {
            title: title.to_string(),
            completed,
        })
    }
}

/// Fields explicitly present in an update request.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn from_json(payload: &Value) -> Result<Self, ApiError> {
        let fields = payload
            .as_object()
            .ok_or_else(|| ApiError::validation("request body must be a JSON object"))?;

        let mut patch = Self::default();
        if let Some(title) = fields.get("title") {
            match title.as_str() {
                Some(title) if !title.is_empty() => patch.title = Some(title.to_string()),
                _ => return Err(ApiError::validation("title must be a non-empty string")),
            }
        }
        if let Some(completed) = fields.get("completed") {
            let completed = completed
                .as_bool()
                .ok_or_else(|| ApiError::validation("completed must be a boolean"))?;
            patch.completed = Some(completed);
        }
        Ok(patch)
    }

    /// Overwrite only the present fields. `id` and `created_at` never change.
    pub fn apply(self, mut todo: Todo) -> Todo {
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        todo
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteConfirmation {
    pub message: &'static str,
    pub id: String,
}

pub async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let todos = db.read().await.get_all();
    debug!(count = todos.len(), "listing todos");
    Json(todos)
}

pub async fn get_todo(
    State(db): State<Db>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Path(id) = path?;
    debug!(%id, "fetching todo");
    let store = db.read().await;
    store.get(&id).cloned().map(Json).ok_or(ApiError::NotFound)
}

pub async fn create_todo(
    State(db): State<Db>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let body = body?;
    let payload: Value = serde_json::from_slice(&body)?;
    let input = NewTodo::from_json(&payload)?;

    let now = Utc::now();
    let mut store = db.write().await;
    let id = store.next_id(now);
    let todo = Todo {
        id: id.clone(),
        title: input.title,
        completed: input.completed,
        created_at: iso_timestamp(now),
    };
    store.set(id, todo.clone());
    info!(id = %todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    State(db): State<Db>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Path(id) = path?;
    let mut store = db.write().await;
    let existing = store.get(&id).cloned().ok_or(ApiError::NotFound)?;

    let body = body?;
    let payload: Value = serde_json::from_slice(&body)?;
    let updated = TodoPatch::from_json(&payload)?.apply(existing);
    store.set(id, updated.clone());
    info!(id = %updated.id, completed = updated.completed, "updated todo");
    Ok(Json(updated))
}

pub async fn delete_todo(
    State(db): State<Db>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteConfirmation>, ApiError> {
    let Path(id) = path?;
    let mut store = db.write().await;
    if !store.contains(&id) {
        return Err(ApiError::NotFound);
    }
    store.delete(&id);
    info!(%id, "deleted todo");
    Ok(Json(DeleteConfirmation {
        message: "Todo deleted successfully",
        id,
    }))
}
