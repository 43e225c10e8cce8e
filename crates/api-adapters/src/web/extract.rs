//! # Extractors
//!
//! Binding failures are not left to axum's plain-text rejections: a body or
//! path that cannot be bound becomes a validation error, and a missing or bad
//! token becomes an unauthorized error. Both then flow through the same
//! responder as everything else.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use domains::AppError;
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use super::state::AppState;
use crate::error::ApiError;
use crate::validation::{self, BODY_FIELD, ID_FIELD};

/// Message for requests without a usable bearer token.
pub const MISSING_TOKEN_MESSAGE: &str = "Missing or invalid bearer token";

/// JSON body that has passed the validation gate.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(model) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            debug!(reason = %rejection.body_text(), "request body could not be bound");
            validation::binding_error(BODY_FIELD, rejection.body_text())
        })?;

        validation::check(&model)?;
        Ok(ValidatedJson(model))
    }
}

/// Numeric id taken from the `{id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub i64);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| validation::binding_error(ID_FIELD, rejection.body_text()))?;
        Ok(ResourceId(id))
    }
}

/// The caller identified by a valid `Authorization: Bearer <token>` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthorized(MISSING_TOKEN_MESSAGE))?;

        let claims = state.tokens.verify(token).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            AppError::unauthorized(MISSING_TOKEN_MESSAGE)
        })?;

        let id = claims
            .user_id()
            .ok_or_else(|| AppError::unauthorized(MISSING_TOKEN_MESSAGE))?;

        Ok(AuthUser {
            id,
            email: claims.email,
            username: claims.username,
        })
    }
}
