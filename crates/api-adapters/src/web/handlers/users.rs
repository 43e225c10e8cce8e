use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use services::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserDto};

use crate::error::ApiError;
use crate::validation;
use crate::web::extract::{AuthUser, ResourceId, ValidatedJson};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterUserRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let response = state.users.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    Ok(Json(state.users.login(request).await?))
}

pub async fn me(State(state): State<AppState>, user: AuthUser) -> Result<Json<UserDto>, ApiError> {
    Ok(Json(state.users.get(user.id).await?))
}

pub async fn get(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<UserDto>, ApiError> {
    Ok(Json(state.users.get(id).await?))
}

/// `GET /api/users/lookup?email=...`
pub async fn lookup(
    State(state): State<AppState>,
    query: Result<Query<EmailQuery>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<UserDto>, ApiError> {
    let Query(query) =
        query.map_err(|rejection| validation::binding_error("email", rejection.body_text()))?;
    Ok(Json(state.users.find_by_email(query.email.trim()).await?))
}
