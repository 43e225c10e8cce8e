//! # AppError
//!
//! Centralized error taxonomy for PostHub.
//! Every failure a service can *classify* is one of the four [`AppError`] variants;
//! each variant fixes its HTTP status and machine-readable code, only the message
//! and the contextual payload vary per instance.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

/// Fixed message carried by every [`AppError::Validation`].
pub const VALIDATION_MESSAGE: &str = "One or more validation errors occurred";

/// Message used by [`AppError::unauthorized_access`].
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access";

/// String-keyed contextual payload attached to an error.
pub type AdditionalData = Map<String, Value>;

/// Field name → failure messages, in detection order.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Discriminant of [`AppError`], used wherever code needs to branch on the kind
/// without touching the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    BadRequest,
    Validation,
}

impl ErrorKind {
    pub const fn status_code(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::Unauthorized => 403,
            ErrorKind::BadRequest => 400,
            ErrorKind::Validation => 422,
        }
    }

    pub const fn error_code(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Validation => "VALIDATION_ERROR",
        }
    }

    /// Name recorded in log events.
    pub const fn name(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFoundError",
            ErrorKind::Unauthorized => "UnauthorizedError",
            ErrorKind::BadRequest => "BadRequestError",
            ErrorKind::Validation => "ValidationError",
        }
    }
}

/// The classified failure kinds raised by services and the validation gate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// Resource not found (e.g., Post, Comment, User)
    #[error("{message}")]
    NotFound {
        message: String,
        additional_data: Option<AdditionalData>,
    },

    /// Caller is not allowed to do this (bad credentials, not the owner)
    #[error("{message}")]
    Unauthorized {
        message: String,
        additional_data: Option<AdditionalData>,
    },

    /// Request is well-formed but breaks a domain rule (e.g., duplicate email)
    #[error("{message}")]
    BadRequest {
        message: String,
        additional_data: Option<AdditionalData>,
    },

    /// One or more fields failed validation
    #[error("{}", VALIDATION_MESSAGE)]
    Validation { errors: FieldErrors },
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
            additional_data: None,
        }
    }

    /// NotFound for a typed resource: `"{resource_type} with ID {id} not found"`,
    /// with `{ResourceType, Id}` as the payload.
    pub fn resource_not_found(resource_type: &str, id: i64) -> Self {
        let mut data = AdditionalData::new();
        data.insert("ResourceType".into(), Value::from(resource_type));
        data.insert("Id".into(), Value::from(id));
        AppError::NotFound {
            message: format!("{resource_type} with ID {id} not found"),
            additional_data: Some(data),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            message: message.into(),
            additional_data: None,
        }
    }

    pub fn unauthorized_access() -> Self {
        Self::unauthorized(UNAUTHORIZED_MESSAGE)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            additional_data: None,
        }
    }

    pub fn validation(errors: FieldErrors) -> Self {
        AppError::Validation { errors }
    }

    /// Attaches a payload. Validation errors keep their fixed payload.
    pub fn with_additional_data(mut self, data: AdditionalData) -> Self {
        match &mut self {
            AppError::NotFound {
                additional_data, ..
            }
            | AppError::Unauthorized {
                additional_data, ..
            }
            | AppError::BadRequest {
                additional_data, ..
            } => *additional_data = Some(data),
            AppError::Validation { .. } => {}
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::Unauthorized { .. } => ErrorKind::Unauthorized,
            AppError::BadRequest { .. } => ErrorKind::BadRequest,
            AppError::Validation { .. } => ErrorKind::Validation,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    pub fn error_code(&self) -> &'static str {
        self.kind().error_code()
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::NotFound { message, .. }
            | AppError::Unauthorized { message, .. }
            | AppError::BadRequest { message, .. } => message,
            AppError::Validation { .. } => VALIDATION_MESSAGE,
        }
    }

    /// Contextual payload. For validation errors this is `{Errors: <field errors>}`.
    pub fn additional_data(&self) -> Option<AdditionalData> {
        match self {
            AppError::NotFound {
                additional_data, ..
            }
            | AppError::Unauthorized {
                additional_data, ..
            }
            | AppError::BadRequest {
                additional_data, ..
            } => additional_data.clone(),
            AppError::Validation { errors } => {
                let mut data = AdditionalData::new();
                data.insert("Errors".into(), field_errors_to_value(errors));
                Some(data)
            }
        }
    }

    /// Per-field failures; only validation errors carry them.
    pub fn validation_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::Validation { errors } => Some(errors),
            _ => None,
        }
    }
}

fn field_errors_to_value(errors: &FieldErrors) -> Value {
    Value::Object(
        errors
            .iter()
            .map(|(field, messages)| {
                let messages = messages.iter().cloned().map(Value::String).collect();
                (field.clone(), Value::Array(messages))
            })
            .collect(),
    )
}

/// Failures raised by persistence adapters.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Entity id was not present when an update or delete expected it
    #[error("{resource} with ID {id} does not exist in the store")]
    Missing { resource: &'static str, id: i64 },

    /// Store is unreachable or refused the operation
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Failures raised by password hashing and token adapters.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token could not be issued: {0}")]
    Issuing(String),

    #[error("token rejected: {0}")]
    InvalidToken(String),
}

/// Everything a service call can fail with. Only [`ServiceError::Application`] is
/// classified; the rest end up on the unexpected-error path.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Application(#[from] AppError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// A specialized Result type for PostHub service logic.
pub type Result<T> = std::result::Result<T, ServiceError>;
