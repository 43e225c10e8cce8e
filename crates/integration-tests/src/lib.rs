//! Shared fixtures for the API tests.
//!
//! `TestApp` drives the real router in-process through `tower::ServiceExt`,
//! with the in-memory store and the real JWT adapter. Passwords go through a
//! trivial hasher so tests do not pay for Argon2.

#![cfg(feature = "web-axum")]

use std::sync::Arc;

use api_adapters::web::{create_router, AppState};
use api_adapters::ErrorResponder;
use async_trait::async_trait;
use auth_adapters::JwtTokenService;
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use domains::{AuthError, Entity, EntitySet, PasswordHasher, Post, Predicate, RepositoryError};
use secrecy::SecretString;
use serde_json::{json, Value};
use storage_adapters::MemoryDataContext;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789";
pub const TEST_ISSUER: &str = "posthub";
pub const TEST_AUDIENCE: &str = "posthub-clients";

/// Stores passwords as `plain:<password>`.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        match hash.strip_prefix("plain:") {
            Some(stored) => Ok(stored == password),
            None => Err(AuthError::Hashing("not a plain hash".into())),
        }
    }
}

/// A post store that is always down.
pub struct UnavailableStore;

fn outage() -> RepositoryError {
    RepositoryError::Backend("connection refused (db.internal:5432)".into())
}

#[async_trait]
impl<T: Entity> EntitySet<T> for UnavailableStore {
    async fn find_first(&self, _predicate: Predicate<'_, T>) -> Result<Option<T>, RepositoryError> {
        Err(outage())
    }

    async fn find_all(&self, _predicate: Predicate<'_, T>) -> Result<Vec<T>, RepositoryError> {
        Err(outage())
    }

    async fn count(&self, _predicate: Predicate<'_, T>) -> Result<usize, RepositoryError> {
        Err(outage())
    }

    async fn insert(&self, _entity: T) -> Result<T, RepositoryError> {
        Err(outage())
    }

    async fn update(&self, _entity: T) -> Result<T, RepositoryError> {
        Err(outage())
    }

    async fn remove(&self, _id: i64) -> Result<(), RepositoryError> {
        Err(outage())
    }

    async fn remove_where(&self, _predicate: Predicate<'_, T>) -> Result<usize, RepositoryError> {
        Err(outage())
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A registered user: id plus bearer token.
pub struct TestUser {
    pub id: i64,
    pub token: String,
}

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new(is_development: bool) -> Self {
        let data = MemoryDataContext::new();
        Self::with_posts(data.posts.clone(), data, is_development)
    }

    /// App whose post store is [`UnavailableStore`].
    pub fn with_broken_posts(is_development: bool) -> Self {
        let data = MemoryDataContext::new();
        Self::with_posts(Arc::new(UnavailableStore), data, is_development)
    }

    fn with_posts(
        posts: Arc<dyn EntitySet<Post>>,
        data: MemoryDataContext,
        is_development: bool,
    ) -> Self {
        let tokens = Arc::new(JwtTokenService::new(
            &SecretString::from(TEST_SECRET.to_owned()),
            TEST_ISSUER,
            TEST_AUDIENCE,
            chrono::Duration::minutes(30),
        ));
        let state = AppState::new(
            data.users.clone(),
            posts,
            data.comments.clone(),
            Arc::new(PlainHasher),
            tokens,
            ErrorResponder::new(is_development),
        );
        Self {
            router: create_router(state),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.call(Method::GET, uri, None, None).await
    }

    pub async fn register(&self, username: &str, email: &str) -> TestUser {
        let response = self
            .call(
                Method::POST,
                "/api/users/register",
                Some(json!({ "username": username, "email": email, "password": "password123" })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        TestUser {
            id: response.body["user"]["id"].as_i64().expect("user id"),
            token: response.body["token"].as_str().expect("token").to_owned(),
        }
    }

    pub async fn create_post(&self, author: &TestUser, title: &str) -> i64 {
        let response = self
            .call(
                Method::POST,
                "/api/posts",
                Some(json!({ "title": title, "body": "Post body" })),
                Some(&author.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().expect("post id")
    }

    pub async fn create_comment(&self, author: &TestUser, post_id: i64, body: &str) -> i64 {
        let response = self
            .call(
                Method::POST,
                &format!("/api/posts/{post_id}/comments"),
                Some(json!({ "body": body })),
                Some(&author.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().expect("comment id")
    }
}
