//! Request handlers, one module per resource.
//!
//! Handlers stay thin: extract, call the service, pick the status code.
//! Every failure is returned as [`ApiError`](crate::ApiError) and rendered by
//! the error middleware.

pub mod comments;
pub mod posts;
pub mod users;

use axum::extract::OriginalUri;
use axum::http::{Method, Uri};
use axum::Json;
use domains::AppError;
use serde_json::{json, Value};

use crate::error::ApiError;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Fallback for unmatched routes.
pub async fn no_route(method: Method, uri: Uri) -> ApiError {
    AppError::not_found(format!("No route for {method} {}", uri.path())).into()
}

/// Fallback for a known path hit with a method it does not serve. The path is
/// taken from the original URI so nested routes report their full path.
pub async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    AppError::bad_request(format!("Method {method} is not allowed on {}", uri.path())).into()
}
