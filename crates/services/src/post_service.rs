//! Post CRUD.

use std::sync::Arc;

use chrono::Utc;
use domains::lookup::{by_id_or_not_found, missing_as_not_found};
use domains::{AppError, Comment, EntitySet, Post, Result};
use tracing::info;

use crate::dto::{CreatePostRequest, PostDto, UpdatePostRequest};

pub const NOT_POST_AUTHOR: &str = "You are not allowed to modify this post";

pub struct PostService {
    posts: Arc<dyn EntitySet<Post>>,
    comments: Arc<dyn EntitySet<Comment>>,
}

impl PostService {
    pub fn new(posts: Arc<dyn EntitySet<Post>>, comments: Arc<dyn EntitySet<Comment>>) -> Self {
        Self { posts, comments }
    }

    /// All posts, newest first.
    pub async fn list(&self) -> Result<Vec<PostDto>> {
        let mut posts = self.posts.find_all(&|_: &Post| true).await?;
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let mut dtos = Vec::with_capacity(posts.len());
        for post in posts {
            let count = self.comment_count(post.id).await?;
            dtos.push(PostDto::new(post, count));
        }
        Ok(dtos)
    }

    pub async fn get(&self, id: i64) -> Result<PostDto> {
        let post: Post = by_id_or_not_found(self.posts.as_ref(), id).await?;
        let count = self.comment_count(id).await?;
        Ok(PostDto::new(post, count))
    }

    pub async fn create(&self, author_id: i64, request: CreatePostRequest) -> Result<PostDto> {
        let post = self
            .posts
            .insert(Post {
                id: 0,
                title: request.title.trim().to_string(),
                body: request.body,
                author_id,
                created_at: Utc::now(),
                updated_at: None,
            })
            .await?;
        info!(post_id = post.id, author_id, "post created");
        Ok(PostDto::new(post, 0))
    }

    pub async fn update(&self, actor_id: i64, id: i64, request: UpdatePostRequest) -> Result<PostDto> {
        let mut post: Post = by_id_or_not_found(self.posts.as_ref(), id).await?;
        ensure_author(&post, actor_id)?;

        post.title = request.title.trim().to_string();
        post.body = request.body;
        post.updated_at = Some(Utc::now());
        let post = self.posts.update(post).await.map_err(missing_as_not_found)?;

        let count = self.comment_count(id).await?;
        info!(post_id = id, "post updated");
        Ok(PostDto::new(post, count))
    }

    /// Deletes the post and every comment attached to it.
    pub async fn delete(&self, actor_id: i64, id: i64) -> Result<()> {
        let post: Post = by_id_or_not_found(self.posts.as_ref(), id).await?;
        ensure_author(&post, actor_id)?;

        let removed = self.comments.remove_where(&|c: &Comment| c.post_id == id).await?;
        self.posts.remove(id).await.map_err(missing_as_not_found)?;
        info!(post_id = id, comments_removed = removed, "post deleted");
        Ok(())
    }

    async fn comment_count(&self, post_id: i64) -> Result<usize> {
        Ok(self.comments.count(&|c: &Comment| c.post_id == post_id).await?)
    }
}

fn ensure_author(post: &Post, actor_id: i64) -> std::result::Result<(), AppError> {
    if post.author_id == actor_id {
        Ok(())
    } else {
        Err(AppError::unauthorized(NOT_POST_AUTHOR))
    }
}
