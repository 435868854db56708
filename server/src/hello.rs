//! JSON echo endpoint at `/api/hello`.

use axum::{body::Bytes, extract::rejection::BytesRejection, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ApiError;
use crate::store::iso_timestamp;

#[derive(Debug, Serialize)]
pub struct Echo {
    pub message: &'static str,
    pub received: Value,
    pub timestamp: String,
}

/// Echo any JSON body back with a greeting and the current time.
pub async fn echo(body: Result<Bytes, BytesRejection>) -> Result<Json<Echo>, ApiError> {
    let body = body?;
    let received: Value = serde_json::from_slice(&body)?;
    debug!(bytes = body.len(), "echoing body");
    Ok(Json(Echo {
        message: "Hello from todo-server!",
        received,
        timestamp: iso_timestamp(Utc::now()),
    }))
}

/// GET is never echoed; the reply only points at POST.
pub async fn reject_get() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "message": "This endpoint only accepts POST requests",
            "hint": "Try sending a POST request with JSON body",
        })),
    )
}
