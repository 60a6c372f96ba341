//! Like and comment integration tests

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use pretty_assertions::assert_eq;
use serde_json::json;
use socialhub::backend::store::PostStore;
use socialhub::shared::PostView;
use uuid::Uuid;

use crate::common::{TestApp, TestUser};

async fn create_text_post(app: &TestApp, user: &TestUser, text: &str) -> PostView {
    let response = app
        .server
        .post("/posts/create")
        .authorization_bearer(&user.token)
        .multipart(MultipartForm::new().add_text("text", text.to_string()))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_like_toggles_on_and_off() {
    let app = TestApp::new();
    let author = app.sign_in("Ada").await;
    let fan = app.sign_in("Grace").await;
    let post = create_text_post(&app, &author, "hello").await;
    let path = format!("/posts/{}/like", post.id);

    let liked: PostView = app
        .server
        .post(&path)
        .authorization_bearer(&fan.token)
        .await
        .json();
    assert_eq!(liked.likes, vec![fan.id]);
    assert!(liked.is_liked_by(fan.id));
    assert_eq!(liked.user.id, author.id);

    let unliked: PostView = app
        .server
        .post(&path)
        .authorization_bearer(&fan.token)
        .await
        .json();
    assert!(unliked.likes.is_empty());
}

#[tokio::test]
async fn test_like_unknown_post() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;

    let response = app
        .server
        .post(&format!("/posts/{}/like", Uuid::new_v4()))
        .authorization_bearer(&user.token)
        .await;
    crate::assert_error_body!(response, StatusCode::NOT_FOUND, "Post not found");

    let response = app
        .server
        .post("/posts/not-a-uuid/like")
        .authorization_bearer(&user.token)
        .await;
    crate::assert_error_body!(response, StatusCode::NOT_FOUND, "Post not found");
}

#[tokio::test]
async fn test_like_requires_session() {
    let app = TestApp::new();
    let author = app.sign_in("Ada").await;
    let post = create_text_post(&app, &author, "hello").await;

    let response = app.server.post(&format!("/posts/{}/like", post.id)).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let stored = app.store.get_post(post.id).await.unwrap();
    assert!(stored.likes.is_empty());
}

#[tokio::test]
async fn test_concurrent_likes_from_different_users() {
    let app = TestApp::new();
    let author = app.sign_in("Ada").await;
    let grace = app.sign_in("Grace").await;
    let linus = app.sign_in("Linus").await;
    let post = create_text_post(&app, &author, "hello").await;
    let path = format!("/posts/{}/like", post.id);

    let (first, second) = tokio::join!(
        async { app.server.post(&path).authorization_bearer(&grace.token).await },
        async { app.server.post(&path).authorization_bearer(&linus.token).await },
    );
    first.assert_status_ok();
    second.assert_status_ok();

    let stored = app.store.get_post(post.id).await.unwrap();
    assert_eq!(stored.likes.len(), 2);
    assert!(stored.is_liked_by(grace.id));
    assert!(stored.is_liked_by(linus.id));
}

#[tokio::test]
async fn test_concurrent_double_like_cancels_out() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;
    let post = create_text_post(&app, &user, "hello").await;
    let path = format!("/posts/{}/like", post.id);

    let (first, second) = tokio::join!(
        async { app.server.post(&path).authorization_bearer(&user.token).await },
        async { app.server.post(&path).authorization_bearer(&user.token).await },
    );
    first.assert_status_ok();
    second.assert_status_ok();

    let stored = app.store.get_post(post.id).await.unwrap();
    assert!(stored.likes.is_empty());
}

#[tokio::test]
async fn test_comment_is_appended_with_author() {
    let app = TestApp::new();
    let author = app.sign_in("Ada").await;
    let commenter = app.sign_in("Grace").await;
    let post = create_text_post(&app, &author, "hello").await;

    let response = app
        .server
        .post(&format!("/posts/{}/comment", post.id))
        .authorization_bearer(&commenter.token)
        .json(&json!({ "text": "  nice post  " }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let updated: PostView = response.json();
    assert_eq!(updated.comments.len(), 1);
    let comment = &updated.comments[0];
    assert_eq!(comment.text, "nice post");
    assert_eq!(comment.user.id, commenter.id);
    assert_eq!(comment.user.name, "Grace");
    assert_eq!(
        comment.user.profile_pic.as_deref(),
        Some("https://pics.test/grace.png")
    );
}

#[tokio::test]
async fn test_comments_keep_insertion_order() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;
    let post = create_text_post(&app, &user, "hello").await;
    let path = format!("/posts/{}/comment", post.id);

    for text in ["one", "two", "three"] {
        app.server
            .post(&path)
            .authorization_bearer(&user.token)
            .json(&json!({ "text": text }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let stored = app.store.get_post(post.id).await.unwrap();
    let texts: Vec<&str> = stored.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn test_blank_comment_rejected() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;
    let post = create_text_post(&app, &user, "hello").await;

    let response = app
        .server
        .post(&format!("/posts/{}/comment", post.id))
        .authorization_bearer(&user.token)
        .json(&json!({ "text": "   " }))
        .await;

    crate::assert_error_body!(response, StatusCode::BAD_REQUEST, "Comment text cannot be empty");
    let stored = app.store.get_post(post.id).await.unwrap();
    assert!(stored.comments.is_empty());
}

#[tokio::test]
async fn test_comment_with_malformed_body_rejected() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;
    let post = create_text_post(&app, &user, "hello").await;

    let response = app
        .server
        .post(&format!("/posts/{}/comment", post.id))
        .authorization_bearer(&user.token)
        .json(&json!({ "body": "wrong field" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comment_on_unknown_post() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;

    let response = app
        .server
        .post(&format!("/posts/{}/comment", Uuid::new_v4()))
        .authorization_bearer(&user.token)
        .json(&json!({ "text": "hello?" }))
        .await;

    crate::assert_error_body!(response, StatusCode::NOT_FOUND, "Post not found");
    assert!(app.store.list_posts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_comment_requires_session() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;
    let post = create_text_post(&app, &user, "hello").await;

    let response = app
        .server
        .post(&format!("/posts/{}/comment", post.id))
        .json(&json!({ "text": "anonymous" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
