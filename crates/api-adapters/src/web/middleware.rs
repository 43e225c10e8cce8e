//! # Error Middleware
//!
//! `respond_to_errors` is the single place an error becomes a response body.
//! It sits inside the request-id layers, so the trace id it echoes is the
//! `x-request-id` the client gets back in the response headers.

use std::any::Any;

use axum::extract::{Request, State};
use axum::http::HeaderName;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_http::request_id::RequestId;
use uuid::Uuid;

use super::response::PendingError;
use crate::error::ApiError;
use crate::responder::ErrorResponder;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Renders any [`ApiError`] left in the response extensions by a handler,
/// an extractor or the panic catcher.
pub async fn respond_to_errors(
    State(responder): State<ErrorResponder>,
    request: Request,
    next: Next,
) -> Response {
    let trace_id = trace_id_of(&request);
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<PendingError>() {
        Some(PendingError(err)) => responder.render(&err, &trace_id).into_response(),
        None => response,
    }
}

/// Request id assigned by `SetRequestIdLayer`, falling back to the raw header
/// and then to a fresh id.
pub fn trace_id_of(request: &Request) -> String {
    request
        .extensions()
        .get::<RequestId>()
        .map(RequestId::header_value)
        .or_else(|| request.headers().get(&REQUEST_ID_HEADER))
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// `CatchPanicLayer` hook: a panicking handler becomes an unexpected error.
pub fn panic_to_error(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_owned()
    } else {
        "non-string panic payload".to_owned()
    };
    ApiError::unexpected(anyhow::anyhow!("request handler panicked: {detail}")).into_response()
}
