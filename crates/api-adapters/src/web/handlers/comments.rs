use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use services::dto::{CommentDto, CreateCommentRequest, UpdateCommentRequest};

use crate::error::ApiError;
use crate::web::extract::{AuthUser, ResourceId, ValidatedJson};
use crate::web::state::AppState;

/// Comments of the post named by the path id, oldest first.
pub async fn list_for_post(
    State(state): State<AppState>,
    ResourceId(post_id): ResourceId,
) -> Result<Json<Vec<CommentDto>>, ApiError> {
    Ok(Json(state.comments.list_for_post(post_id).await?))
}

pub async fn get(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<CommentDto>, ApiError> {
    Ok(Json(state.comments.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ResourceId(post_id): ResourceId,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentDto>), ApiError> {
    let comment = state.comments.create(user.id, post_id, request).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    ResourceId(id): ResourceId,
    ValidatedJson(request): ValidatedJson<UpdateCommentRequest>,
) -> Result<Json<CommentDto>, ApiError> {
    Ok(Json(state.comments.update(user.id, id, request).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    state.comments.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
