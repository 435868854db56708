//! Error responses for the HTTP API.
//!
//! Every failure a handler can hit maps to one `ApiError` variant, and every
//! variant renders as a JSON body with an `error` field. Nothing here is
//! fatal to the process.

use axum::{
    extract::rejection::{BytesRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or has the wrong type.
    #[error("{0}")]
    Validation(String),

    /// The referenced todo does not exist.
    #[error("Todo not found")]
    NotFound,

    /// The request body is not valid JSON.
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The path parameter could not be extracted, e.g. invalid UTF-8.
    #[error("Invalid path parameter: {0}")]
    InvalidPath(#[from] PathRejection),

    /// The request body could not be read, e.g. over the size limit.
    #[error("Failed to read request body: {0}")]
    UnreadableBody(#[from] BytesRejection),

    /// The route exists but does not serve this verb.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// No route matches the path.
    #[error("Not found")]
    RouteNotFound,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidPath(rejection) => rejection.status(),
            ApiError::UnreadableBody(rejection) => rejection.status(),
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::InvalidJson(err) => ErrorBody {
                error: "Invalid JSON body".to_string(),
                message: Some(err.to_string()),
            },
            ApiError::InvalidPath(rejection) => ErrorBody {
                error: "Invalid path parameter".to_string(),
                message: Some(rejection.body_text()),
            },
            ApiError::UnreadableBody(rejection) => ErrorBody {
                error: "Failed to read request body".to_string(),
                message: Some(rejection.body_text()),
            },
            other => ErrorBody {
                error: other.to_string(),
                message: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(status = self.status().as_u16(), error = %self, "request rejected");
        (self.status(), Json(self.body())).into_response()
    }
}

/// Method fallback for routes that exist but do not serve the verb.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Router fallback for unknown paths.
pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
