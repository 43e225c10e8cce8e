//! Comment CRUD. Every comment belongs to an existing post.

use std::sync::Arc;

use chrono::Utc;
use domains::lookup::{by_id_or_not_found, missing_as_not_found};
use domains::{AppError, Comment, EntitySet, Post, Result};
use tracing::info;

use crate::dto::{CommentDto, CreateCommentRequest, UpdateCommentRequest};

pub const NOT_COMMENT_AUTHOR: &str = "You are not allowed to modify this comment";

pub struct CommentService {
    posts: Arc<dyn EntitySet<Post>>,
    comments: Arc<dyn EntitySet<Comment>>,
}

impl CommentService {
    pub fn new(posts: Arc<dyn EntitySet<Post>>, comments: Arc<dyn EntitySet<Comment>>) -> Self {
        Self { posts, comments }
    }

    /// Comments on a post, oldest first. The post itself must exist.
    pub async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentDto>> {
        let _post: Post = by_id_or_not_found(self.posts.as_ref(), post_id).await?;
        let comments = self
            .comments
            .find_all(&|c: &Comment| c.post_id == post_id)
            .await?;
        Ok(comments.into_iter().map(CommentDto::from).collect())
    }

    pub async fn get(&self, id: i64) -> Result<CommentDto> {
        let comment: Comment = by_id_or_not_found(self.comments.as_ref(), id).await?;
        Ok(comment.into())
    }

    pub async fn create(
        &self,
        author_id: i64,
        post_id: i64,
        request: CreateCommentRequest,
    ) -> Result<CommentDto> {
        let _post: Post = by_id_or_not_found(self.posts.as_ref(), post_id).await?;
        let comment = self
            .comments
            .insert(Comment {
                id: 0,
                post_id,
                author_id,
                body: request.body,
                created_at: Utc::now(),
                updated_at: None,
            })
            .await?;
        info!(comment_id = comment.id, post_id, author_id, "comment created");
        Ok(comment.into())
    }

    pub async fn update(
        &self,
        actor_id: i64,
        id: i64,
        request: UpdateCommentRequest,
    ) -> Result<CommentDto> {
        let mut comment: Comment = by_id_or_not_found(self.comments.as_ref(), id).await?;
        ensure_author(&comment, actor_id)?;

        comment.body = request.body;
        comment.updated_at = Some(Utc::now());
        let comment = self.comments.update(comment).await.map_err(missing_as_not_found)?;
        info!(comment_id = id, "comment updated");
        Ok(comment.into())
    }

    pub async fn delete(&self, actor_id: i64, id: i64) -> Result<()> {
        let comment: Comment = by_id_or_not_found(self.comments.as_ref(), id).await?;
        ensure_author(&comment, actor_id)?;

        self.comments.remove(id).await.map_err(missing_as_not_found)?;
        info!(comment_id = id, "comment deleted");
        Ok(())
    }
}

fn ensure_author(comment: &Comment, actor_id: i64) -> std::result::Result<(), AppError> {
    if comment.author_id == actor_id {
        Ok(())
    } else {
        Err(AppError::unauthorized(NOT_COMMENT_AUTHOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::ServiceError;
    use serde_json::json;
    use storage_adapters::MemoryDataContext;

    use crate::test_support::VanishingSet;

    fn service(data: &MemoryDataContext) -> CommentService {
        CommentService::new(data.posts.clone(), data.comments.clone())
    }

    fn body(text: &str) -> CreateCommentRequest {
        CreateCommentRequest { body: text.into() }
    }

    fn app_error(err: ServiceError) -> AppError {
        match err {
            ServiceError::Application(app) => app,
            other => panic!("expected an application error, got {other:?}"),
        }
    }

    async fn seed_post(data: &MemoryDataContext) -> Post {
        data.posts
            .insert(Post {
                id: 0,
                title: "A post".into(),
                body: "text".into(),
                author_id: 1,
                created_at: Utc::now(),
                updated_at: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn commenting_on_a_missing_post_is_not_found() {
        let data = MemoryDataContext::new();
        let err = app_error(service(&data).create(1, 42, body("hi")).await.unwrap_err());
        assert_eq!(err.message(), "Post with ID 42 not found");
        assert_eq!(
            err.additional_data().map(serde_json::Value::Object),
            Some(json!({ "ResourceType": "Post", "Id": 42 }))
        );
        assert!(data.comments.is_empty());
    }

    #[tokio::test]
    async fn list_for_post_returns_only_its_comments() {
        let data = MemoryDataContext::new();
        let comments = service(&data);
        let a = seed_post(&data).await;
        let b = seed_post(&data).await;
        comments.create(2, a.id, body("on a")).await.unwrap();
        comments.create(2, b.id, body("on b")).await.unwrap();
        comments.create(3, a.id, body("also on a")).await.unwrap();

        let bodies: Vec<String> = comments
            .list_for_post(a.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.body)
            .collect();
        assert_eq!(bodies, vec!["on a", "also on a"]);
    }

    #[tokio::test]
    async fn list_for_missing_post_is_not_found() {
        let data = MemoryDataContext::new();
        let err = app_error(service(&data).list_for_post(5).await.unwrap_err());
        assert_eq!(err.message(), "Post with ID 5 not found");
    }

    #[tokio::test]
    async fn get_missing_comment_uses_comment_label() {
        let data = MemoryDataContext::new();
        let err = app_error(service(&data).get(9).await.unwrap_err());
        assert_eq!(err.message(), "Comment with ID 9 not found");
    }

    #[tokio::test]
    async fn only_the_author_may_edit_or_delete() {
        let data = MemoryDataContext::new();
        let comments = service(&data);
        let post = seed_post(&data).await;
        let created = comments.create(2, post.id, body("mine")).await.unwrap();

        let err = app_error(comments.update(3, created.id, body("edited")).await.unwrap_err());
        assert_eq!(err.message(), NOT_COMMENT_AUTHOR);
        let err = app_error(comments.delete(3, created.id).await.unwrap_err());
        assert_eq!(err.status_code(), 403);

        let edited = comments.update(2, created.id, body("edited")).await.unwrap();
        assert_eq!(edited.body, "edited");
        comments.delete(2, created.id).await.unwrap();
        assert!(data.comments.is_empty());
    }

    #[tokio::test]
    async fn comment_removed_by_a_concurrent_request_is_not_found() {
        let data = MemoryDataContext::new();
        let post = seed_post(&data).await;
        let vanishing = Arc::new(VanishingSet::<Comment>::new());
        let comments = CommentService::new(data.posts.clone(), vanishing.clone());

        let comment = vanishing
            .seed(Comment {
                id: 0,
                post_id: post.id,
                author_id: 2,
                body: "gone soon".into(),
                created_at: Utc::now(),
                updated_at: None,
            })
            .await;
        let err = app_error(comments.delete(2, comment.id).await.unwrap_err());
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), format!("Comment with ID {} not found", comment.id));
    }
}
