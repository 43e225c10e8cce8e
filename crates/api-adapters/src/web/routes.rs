//! # Router
//!
//! Layer order, outermost first:
//! 1. `SetRequestIdLayer` assigns `x-request-id` unless the client sent one
//! 2. `TraceLayer` opens the request span
//! 3. `PropagateRequestIdLayer` copies the id onto the response
//! 4. `respond_to_errors` renders every pending [`ApiError`](crate::ApiError)
//! 5. `CatchPanicLayer` turns handler panics into unexpected errors

use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info_span;

use super::handlers::{comments, health, method_not_allowed, no_route, posts, users};
use super::middleware::{panic_to_error, respond_to_errors, REQUEST_ID_HEADER};
use super::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let responder = state.responder;

    let api = Router::new()
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/me", get(users::me))
        .route("/users/lookup", get(users::lookup))
        .route("/users/{id}", get(users::get))
        .route("/posts", get(posts::list).post(posts::create))
        .route(
            "/posts/{id}",
            get(posts::get).put(posts::update).delete(posts::delete),
        )
        .route(
            "/posts/{id}/comments",
            get(comments::list_for_post).post(comments::create),
        )
        .route(
            "/comments/{id}",
            get(comments::get)
                .put(comments::update)
                .delete(comments::delete),
        )
        .method_not_allowed_fallback(method_not_allowed);

    Router::new()
        .route("/health", get(health))
        .method_not_allowed_fallback(method_not_allowed)
        .nest("/api", api)
        .fallback(no_route)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(&REQUEST_ID_HEADER)
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");
                    info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
                .layer(middleware::from_fn_with_state(responder, respond_to_errors))
                .layer(CatchPanicLayer::custom(panic_to_error)),
        )
}
