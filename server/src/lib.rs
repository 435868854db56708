//! HTTP server for the todo API.
//!
//! # Overview
//! Serves a todo CRUD API over an in-memory store plus a JSON echo endpoint.
//! State lives only as long as the process; every start reseeds the same two
//! sample todos.
//!
//! # Routes
//! - `POST /api/hello` echoes its body, `GET /api/hello` is always 405.
//! - `GET|POST /api/todos` lists and creates.
//! - `GET|PATCH|DELETE /api/todos/{id}` reads, partially updates, deletes.
//!
//! Verbs a route does not serve get a JSON 405 and unknown paths a JSON 404.

pub mod config;
pub mod error;
pub mod hello;
pub mod store;
pub mod todos;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use chrono::Utc;
use tokio::{net::TcpListener, sync::RwLock};

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use store::{Db, Todo, TodoStore};

/// Router over a freshly seeded store.
pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(TodoStore::seeded(Utc::now())));
    router(db)
}

/// Router over a caller-supplied store handle.
pub fn router(db: Db) -> Router {
    Router::new()
        .route(
            "/api/hello",
            post(hello::echo)
                .get(hello::reject_get)
                .fallback(error::method_not_allowed),
        )
        .route(
            "/api/todos",
            get(todos::list_todos)
                .post(todos::create_todo)
                .fallback(error::method_not_allowed),
        )
        .route(
            "/api/todos/{id}",
            get(todos::get_todo)
                .patch(todos::update_todo)
                .delete(todos::delete_todo)
                .fallback(error::method_not_allowed),
        )
        .fallback(error::route_not_found)
        .with_state(db)
}

/// Serve `app()` on `listener` until Ctrl-C.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app())
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
