//! # ApiError
//!
//! What the HTTP boundary sees when a request fails. Classified failures keep
//! their [`AppError`]; everything else (store outages, token backends,
//! panics) collapses into [`ApiError::Unexpected`] and is rendered as a 500.

use domains::{AppError, ErrorKind, ServiceError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Application(#[from] AppError),

    #[error(transparent)]
    Unexpected(anyhow::Error),
}

impl ApiError {
    pub fn unexpected(err: impl Into<anyhow::Error>) -> Self {
        ApiError::Unexpected(err.into())
    }

    /// `None` for unexpected errors.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApiError::Application(err) => Some(err.kind()),
            ApiError::Unexpected(_) => None,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().map_or(500, ErrorKind::status_code)
    }

    /// Name recorded in log events.
    pub fn kind_name(&self) -> &'static str {
        self.kind().map_or("UnexpectedError", ErrorKind::name)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Application(app) => ApiError::Application(app),
            ServiceError::Repository(err) => ApiError::Unexpected(err.into()),
            ServiceError::Auth(err) => ApiError::Unexpected(err.into()),
            ServiceError::Unexpected(err) => ApiError::Unexpected(err),
        }
    }
}
