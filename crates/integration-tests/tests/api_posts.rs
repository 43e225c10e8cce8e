use axum::http::{Method, StatusCode};
use integration_tests::TestApp;
use serde_json::json;

#[tokio::test]
async fn create_and_fetch_a_post() {
    let app = TestApp::new(false);
    let alice = app.register("alice", "alice@example.com").await;
    let id = app.create_post(&alice, "  Hello world  ").await;

    let response = app.get(&format!("/api/posts/{id}")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], "Hello world");
    assert_eq!(response.body["authorId"], alice.id);
    assert_eq!(response.body["commentCount"], 0);
}

#[tokio::test]
async fn creating_needs_a_token() {
    let app = TestApp::new(false);
    let response = app
        .call(
            Method::POST,
            "/api/posts",
            Some(json!({ "title": "Hello", "body": "text" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn list_is_newest_first_with_comment_counts() {
    let app = TestApp::new(false);
    let alice = app.register("alice", "alice@example.com").await;
    let first = app.create_post(&alice, "First post").await;
    let second = app.create_post(&alice, "Second post").await;
    app.create_comment(&alice, first, "nice").await;

    let response = app.get("/api/posts").await;
    assert_eq!(response.status, StatusCode::OK);
    let posts = response.body.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["id"], second);
    assert_eq!(posts[1]["id"], first);
    assert_eq!(posts[1]["commentCount"], 1);
}

#[tokio::test]
async fn missing_post_is_a_resource_not_found() {
    let app = TestApp::new(false);
    let response = app.get("/api/posts/123").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["errorCode"], "NOT_FOUND");
    assert_eq!(response.body["message"], "Post with ID 123 not found");
    assert_eq!(
        response.body["additionalData"],
        json!({ "ResourceType": "Post", "Id": 123 })
    );
}

#[tokio::test]
async fn only_the_author_may_update() {
    let app = TestApp::new(false);
    let alice = app.register("alice", "alice@example.com").await;
    let bob = app.register("bob", "bob@example.com").await;
    let id = app.create_post(&alice, "Alice's post").await;

    let response = app
        .call(
            Method::PUT,
            &format!("/api/posts/{id}"),
            Some(json!({ "title": "Hijacked", "body": "by bob" })),
            Some(&bob.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.body["message"],
        "You are not allowed to modify this post"
    );

    let response = app
        .call(
            Method::PUT,
            &format!("/api/posts/{id}"),
            Some(json!({ "title": "Edited title", "body": "new body" })),
            Some(&alice.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], "Edited title");
    assert!(response.body["updatedAt"].is_string());
}

#[tokio::test]
async fn update_is_validated_before_ownership_is_checked() {
    let app = TestApp::new(false);
    let alice = app.register("alice", "alice@example.com").await;
    let bob = app.register("bob", "bob@example.com").await;
    let id = app.create_post(&alice, "Alice's post").await;

    let response = app
        .call(
            Method::PUT,
            &format!("/api/posts/{id}"),
            Some(json!({ "title": "x", "body": "" })),
            Some(&bob.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body["validationErrors"]["title"].is_array());
    assert!(response.body["validationErrors"]["body"].is_array());
}

#[tokio::test]
async fn deleting_a_post_removes_its_comments() {
    let app = TestApp::new(false);
    let alice = app.register("alice", "alice@example.com").await;
    let id = app.create_post(&alice, "Short lived").await;
    let comment = app.create_comment(&alice, id, "first!").await;

    let response = app
        .call(Method::DELETE, &format!("/api/posts/{id}"), None, Some(&alice.token))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    assert_eq!(app.get(&format!("/api/posts/{id}")).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.get(&format!("/api/comments/{comment}")).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn non_numeric_id_is_a_validation_error() {
    let app = TestApp::new(false);
    let response = app.get("/api/posts/abc").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["errorCode"], "VALIDATION_ERROR");
    assert_eq!(
        response.body["validationErrors"]["id"].as_array().map(Vec::len),
        Some(1)
    );
}
