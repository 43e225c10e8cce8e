//! Response plumbing between handlers and the error middleware.
//!
//! A handler returning [`ApiError`] produces a bodyless response that only
//! carries the error in its extensions. [`respond_to_errors`] picks it up,
//! renders the envelope and swaps the body in. Handlers therefore never build
//! error bodies themselves.
//!
//! [`respond_to_errors`]: super::middleware::respond_to_errors

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ApiError;
use crate::responder::RenderedError;

/// An error waiting to be rendered by the middleware.
#[derive(Clone, Debug)]
pub struct PendingError(pub Arc<ApiError>);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = status.into_response();
        response.extensions_mut().insert(PendingError(Arc::new(self)));
        response
    }
}

impl IntoResponse for RenderedError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body)).into_response()
    }
}
