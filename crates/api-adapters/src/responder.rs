//! # Central Error Responder
//!
//! Turns any [`ApiError`] into the one JSON envelope clients see, and logs it
//! at a severity picked from the error kind alone:
//!
//! | kind                               | severity |
//! |------------------------------------|----------|
//! | Validation                         | info     |
//! | NotFound, Unauthorized, BadRequest | warning  |
//! | anything unexpected                | error    |
//!
//! Outside development, unexpected errors never leak their message or debug
//! detail into the body; the log keeps the full detail.
//!
//! This module is framework-free. The axum glue lives in `web::middleware`.

use chrono::{DateTime, Utc};
use domains::{AdditionalData, AppError, ErrorKind, FieldErrors, VALIDATION_MESSAGE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::ApiError;

/// Body message for unexpected errors outside development.
pub const GENERIC_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Error code for unexpected errors.
pub const INTERNAL_ERROR_CODE: &str = "INTERNAL_SERVER_ERROR";

/// Key under which development responses carry debug detail.
pub const STACK_TRACE_KEY: &str = "StackTrace";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// `None` stands for an unclassified (unexpected) error.
    pub fn for_kind(kind: Option<ErrorKind>) -> Self {
        match kind {
            Some(ErrorKind::Validation) => Severity::Info,
            Some(ErrorKind::NotFound | ErrorKind::Unauthorized | ErrorKind::BadRequest) => {
                Severity::Warning
            }
            None => Severity::Error,
        }
    }

    pub fn for_error(err: &ApiError) -> Self {
        Self::for_kind(err.kind())
    }
}

/// Wire shape of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub trace_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<AdditionalData>,
}

/// [`ErrorResponse`] plus the per-field failures of a validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrorResponse {
    #[serde(flatten)]
    pub base: ErrorResponse,
    pub validation_errors: FieldErrors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Validation(ValidationErrorResponse),
    Standard(ErrorResponse),
}

impl ErrorBody {
    pub fn base(&self) -> &ErrorResponse {
        match self {
            ErrorBody::Validation(body) => &body.base,
            ErrorBody::Standard(body) => body,
        }
    }
}

/// Status and body ready to be written by whatever web framework is in use.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedError {
    pub status: u16,
    pub body: ErrorBody,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorResponder {
    is_development: bool,
}

impl ErrorResponder {
    pub fn new(is_development: bool) -> Self {
        Self { is_development }
    }

    pub fn is_development(&self) -> bool {
        self.is_development
    }

    /// Logs `err` and renders it. `trace_id` must be non-empty; it is echoed
    /// verbatim so clients can quote it back.
    pub fn render(&self, err: &ApiError, trace_id: &str) -> RenderedError {
        log_error(err, trace_id);
        self.build(err, trace_id)
    }

    /// Rendering without the log event.
    pub fn build(&self, err: &ApiError, trace_id: &str) -> RenderedError {
        let status = err.status_code();
        let body = match err {
            ApiError::Application(AppError::Validation { errors }) => {
                ErrorBody::Validation(ValidationErrorResponse {
                    base: envelope(
                        ErrorKind::Validation.error_code(),
                        VALIDATION_MESSAGE.to_owned(),
                        trace_id,
                        None,
                    ),
                    validation_errors: errors.clone(),
                })
            }
            ApiError::Application(app) => ErrorBody::Standard(envelope(
                app.error_code(),
                app.message().to_owned(),
                trace_id,
                app.additional_data(),
            )),
            ApiError::Unexpected(inner) if self.is_development => {
                let mut detail = AdditionalData::new();
                detail.insert(STACK_TRACE_KEY.into(), Value::String(format!("{inner:?}")));
                ErrorBody::Standard(envelope(
                    INTERNAL_ERROR_CODE,
                    inner.to_string(),
                    trace_id,
                    Some(detail),
                ))
            }
            ApiError::Unexpected(_) => ErrorBody::Standard(envelope(
                INTERNAL_ERROR_CODE,
                GENERIC_MESSAGE.to_owned(),
                trace_id,
                None,
            )),
        };
        RenderedError { status, body }
    }
}

fn envelope(
    error_code: &str,
    message: String,
    trace_id: &str,
    additional_data: Option<AdditionalData>,
) -> ErrorResponse {
    ErrorResponse {
        error_code: error_code.to_owned(),
        message,
        timestamp: Utc::now(),
        trace_id: trace_id.to_owned(),
        additional_data,
    }
}

fn log_error(err: &ApiError, trace_id: &str) {
    let error_kind = err.kind_name();
    match Severity::for_error(err) {
        Severity::Info => info!(trace_id, error_kind, reason = %err, "request failed validation"),
        Severity::Warning => warn!(trace_id, error_kind, reason = %err, "request rejected"),
        Severity::Error => {
            error!(trace_id, error_kind, detail = ?err, "unhandled error while processing request")
        }
    }
}
