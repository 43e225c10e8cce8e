use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use services::dto::{CreatePostRequest, PostDto, UpdatePostRequest};

use crate::error::ApiError;
use crate::web::extract::{AuthUser, ResourceId, ValidatedJson};
use crate::web::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PostDto>>, ApiError> {
    Ok(Json(state.posts.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<PostDto>, ApiError> {
    Ok(Json(state.posts.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostDto>), ApiError> {
    let post = state.posts.create(user.id, request).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    ResourceId(id): ResourceId,
    ValidatedJson(request): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<PostDto>, ApiError> {
    Ok(Json(state.posts.update(user.id, id, request).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    state.posts.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
