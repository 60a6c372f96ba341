//! Post creation and feed integration tests

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use pretty_assertions::assert_eq;
use socialhub::backend::server::ServerConfig;
use socialhub::backend::store::PostStore;
use socialhub::shared::PostView;
use std::time::Duration;

use crate::common::{eventually, FakeClassifier, FakeMediaStore, TestApp};

fn text_form(text: &str) -> MultipartForm {
    MultipartForm::new().add_text("text", text.to_string())
}

fn image_part(name: &str) -> Part {
    Part::bytes(b"\x89PNG\r\n\x1a\n".to_vec())
        .file_name(name)
        .mime_type("image/png")
}

#[tokio::test]
async fn test_feed_is_public_and_empty() {
    let app = TestApp::new();

    let response = app.server.get("/posts").await;

    response.assert_status_ok();
    let posts: Vec<PostView> = response.json();
    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_create_text_post() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;

    let response = app
        .server
        .post("/posts/create")
        .authorization_bearer(&user.token)
        .multipart(text_form("hello world"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["text"], "hello world");
    assert_eq!(body["mediaType"], "text");
    assert_eq!(body["user"]["name"], "Ada");
    assert_eq!(body["likes"], serde_json::json!([]));
    assert_eq!(body["comments"], serde_json::json!([]));
    assert!(body.get("mediaUrl").is_none());

    let post: PostView = response.json();
    assert_eq!(post.user.id, user.id);
    assert_eq!(app.classifier.calls(), vec!["text:hello world".to_string()]);
    assert!(app.media.uploads().is_empty());
}

#[tokio::test]
async fn test_create_requires_session() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/posts/create")
        .multipart(text_form("hello"))
        .await;

    crate::assert_error_body!(response, StatusCode::UNAUTHORIZED, "Unauthorized");
    assert!(app.classifier.calls().is_empty());
    assert!(app.store.list_posts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_without_content_rejected() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;

    let response = app
        .server
        .post("/posts/create")
        .authorization_bearer(&user.token)
        .multipart(text_form("   "))
        .await;

    crate::assert_error_body!(response, StatusCode::BAD_REQUEST, "Post must have text or media");
    assert!(app.classifier.calls().is_empty());
}

#[tokio::test]
async fn test_create_image_post() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;

    let response = app
        .server
        .post("/posts/create")
        .authorization_bearer(&user.token)
        .multipart(MultipartForm::new().add_part("media", image_part("cat.png")))
        .await;

    response.assert_status(StatusCode::CREATED);
    let post: PostView = response.json();
    assert_eq!(post.media_type.as_str(), "image");
    assert_eq!(post.media_url.as_deref(), Some("https://media.test/posts/cat.png"));
    assert_eq!(post.text, None);
    assert_eq!(app.classifier.calls(), vec!["file:cat.png".to_string()]);
    assert_eq!(app.media.uploads(), vec!["cat.png".to_string()]);
}

#[tokio::test]
async fn test_create_plain_text_attachment() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;

    let note = Part::bytes(b"meeting at noon".to_vec())
        .file_name("note.txt")
        .mime_type("text/plain");
    let response = app
        .server
        .post("/posts/create")
        .authorization_bearer(&user.token)
        .multipart(MultipartForm::new().add_part("media", note))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["mediaType"], "text");
    assert_eq!(body["mediaUrl"], "https://media.test/posts/note.txt");

    assert_eq!(app.classifier.calls(), vec!["file:note.txt".to_string()]);
    assert_eq!(app.media.uploads(), vec!["note.txt".to_string()]);

    let stored = app.store.list_posts().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].media_type.as_str(), "text");
    assert_eq!(
        stored[0].media_url.as_deref(),
        Some("https://media.test/posts/note.txt")
    );
}

#[tokio::test]
async fn test_text_and_file_both_classified_text_first() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;

    let form = text_form("look at this").add_part("media", image_part("cat.png"));
    let response = app
        .server
        .post("/posts/create")
        .authorization_bearer(&user.token)
        .multipart(form)
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        app.classifier.calls(),
        vec!["text:look at this".to_string(), "file:cat.png".to_string()]
    );
    let post: PostView = response.json();
    assert_eq!(post.text.as_deref(), Some("look at this"));
    assert_eq!(post.media_type.as_str(), "image");
}

#[tokio::test]
async fn test_empty_file_part_is_ignored() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;

    let form = text_form("just text").add_part("media", Part::bytes(Vec::<u8>::new()));
    let response = app
        .server
        .post("/posts/create")
        .authorization_bearer(&user.token)
        .multipart(form)
        .await;

    response.assert_status(StatusCode::CREATED);
    let post: PostView = response.json();
    assert_eq!(post.media_type.as_str(), "text");
    assert!(app.media.uploads().is_empty());
}

#[tokio::test]
async fn test_flagged_text_rejected_and_notified() {
    let app = TestApp::builder()
        .classifier(FakeClassifier::flag_text("loser"))
        .build();
    let user = app.sign_in("Ada").await;

    let form = text_form("you are a loser").add_part("media", image_part("cat.png"));
    let response = app
        .server
        .post("/posts/create")
        .authorization_bearer(&user.token)
        .multipart(form)
        .await;

    crate::assert_error_body!(
        response,
        StatusCode::BAD_REQUEST,
        "Content violates community guidelines"
    );
    assert_eq!(app.classifier.calls(), vec!["text:you are a loser".to_string()]);
    assert!(app.media.uploads().is_empty());
    assert!(app.store.list_posts().await.unwrap().is_empty());

    let notifier = app.notifier.clone();
    assert!(eventually(|| notifier.sent() == vec![user.email.clone()]).await);
}

#[tokio::test]
async fn test_flagged_file_rejected_and_notified() {
    let app = TestApp::builder()
        .classifier(FakeClassifier::flag_files())
        .build();
    let user = app.sign_in("Ada").await;

    let response = app
        .server
        .post("/posts/create")
        .authorization_bearer(&user.token)
        .multipart(MultipartForm::new().add_part("media", image_part("meme.png")))
        .await;

    crate::assert_error_body!(
        response,
        StatusCode::BAD_REQUEST,
        "Content violates community guidelines"
    );
    assert!(app.media.uploads().is_empty());
    assert!(app.store.list_posts().await.unwrap().is_empty());

    let notifier = app.notifier.clone();
    assert!(eventually(|| notifier.sent() == vec!["ada@example.com".to_string()]).await);
}

#[tokio::test]
async fn test_classifier_failure_is_fail_closed() {
    let app = TestApp::builder()
        .classifier(FakeClassifier::failing())
        .build();
    let user = app.sign_in("Ada").await;

    let response = app
        .server
        .post("/posts/create")
        .authorization_bearer(&user.token)
        .multipart(text_form("hello"))
        .await;

    crate::assert_error_body!(
        response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Classifier unavailable"
    );
    assert!(app.store.list_posts().await.unwrap().is_empty());
    assert!(app.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_upload_failure_persists_nothing() {
    let app = TestApp::builder().media(FakeMediaStore::failing()).build();
    let user = app.sign_in("Ada").await;

    let response = app
        .server
        .post("/posts/create")
        .authorization_bearer(&user.token)
        .multipart(MultipartForm::new().add_part("media", image_part("cat.png")))
        .await;

    crate::assert_error_body!(response, StatusCode::INTERNAL_SERVER_ERROR, "Invalid API key");
    assert!(app.store.list_posts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unsupported_media_type_rejected() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;

    let pdf = Part::bytes(b"%PDF-1.4".to_vec())
        .file_name("doc.pdf")
        .mime_type("application/pdf");
    let response = app
        .server
        .post("/posts/create")
        .authorization_bearer(&user.token)
        .multipart(MultipartForm::new().add_part("media", pdf))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.classifier.calls().is_empty());
}

#[tokio::test]
async fn test_second_media_file_rejected() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;

    let form = MultipartForm::new()
        .add_part("media", image_part("a.png"))
        .add_part("media", image_part("b.png"));
    let response = app
        .server
        .post("/posts/create")
        .authorization_bearer(&user.token)
        .multipart(form)
        .await;

    crate::assert_error_body!(
        response,
        StatusCode::BAD_REQUEST,
        "Only one media file may be attached"
    );
}

#[tokio::test]
async fn test_oversized_file_rejected() {
    let app = TestApp::builder()
        .config(ServerConfig::builder().max_upload_bytes(16).build().unwrap())
        .build();
    let user = app.sign_in("Ada").await;

    let big = Part::bytes(vec![0u8; 64])
        .file_name("big.png")
        .mime_type("image/png");
    let response = app
        .server
        .post("/posts/create")
        .authorization_bearer(&user.token)
        .multipart(MultipartForm::new().add_part("media", big))
        .await;

    crate::assert_error_body!(response, StatusCode::PAYLOAD_TOO_LARGE, "File too large");
    assert!(app.classifier.calls().is_empty());
}

#[tokio::test]
async fn test_feed_newest_first() {
    let app = TestApp::new();
    let user = app.sign_in("Ada").await;

    for text in ["first", "second", "third"] {
        app.server
            .post("/posts/create")
            .authorization_bearer(&user.token)
            .multipart(text_form(text))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let posts: Vec<PostView> = app.server.get("/posts").await.json();
    let texts: Vec<&str> = posts.iter().filter_map(|p| p.text.as_deref()).collect();
    assert_eq!(texts, vec!["third", "second", "first"]);
    assert!(posts
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
}

#[tokio::test]
async fn test_request_deadline_returns_json_error() {
    let app = TestApp::builder()
        .config(
            ServerConfig::builder()
                .request_timeout(Duration::from_millis(50))
                .build()
                .unwrap(),
        )
        .classifier(FakeClassifier::slow(Duration::from_secs(5)))
        .build();
    let user = app.sign_in("Ada").await;

    let response = app
        .server
        .post("/posts/create")
        .authorization_bearer(&user.token)
        .multipart(text_form("hello"))
        .await;

    crate::assert_error_body!(response, StatusCode::REQUEST_TIMEOUT, "Request timed out");
    assert!(app.store.list_posts().await.unwrap().is_empty());
}
