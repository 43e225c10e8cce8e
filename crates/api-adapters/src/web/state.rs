use std::sync::Arc;

use domains::{Comment, EntitySet, PasswordHasher, Post, TokenService, User};
use services::{CommentService, PostService, UserService};

use crate::responder::ErrorResponder;

/// Everything handlers and extractors need, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub tokens: Arc<dyn TokenService>,
    pub responder: ErrorResponder,
}

impl AppState {
    /// Builds the services on top of the given stores and auth adapters.
    pub fn new(
        users: Arc<dyn EntitySet<User>>,
        posts: Arc<dyn EntitySet<Post>>,
        comments: Arc<dyn EntitySet<Comment>>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
        responder: ErrorResponder,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(users, hasher, tokens.clone())),
            posts: Arc::new(PostService::new(posts.clone(), comments.clone())),
            comments: Arc::new(CommentService::new(posts, comments)),
            tokens,
            responder,
        }
    }
}
