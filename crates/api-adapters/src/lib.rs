//! posthub/crates/api-adapters/src/lib.rs
//!
//! HTTP boundary of PostHub: the error envelope, the central responder and the
//! request validation gate. The axum router sits behind the `web-axum` feature.

pub mod error;
pub mod responder;
pub mod validation;

#[cfg(feature = "web-axum")]
pub mod web;

pub use error::ApiError;
pub use responder::{ErrorBody, ErrorResponder, ErrorResponse, Severity, ValidationErrorResponse};
