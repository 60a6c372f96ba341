//! HttpClassifier against a mocked classifier service

use assert_matches::assert_matches;
use bytes::Bytes;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, body_string_contains, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use socialhub::backend::media::Attachment;
use socialhub::backend::moderation::{
    ClassifierError, ClassifierInput, ContentClassifier, HttpClassifier,
};
use socialhub::backend::server::ServerConfig;

fn classifier_for(server: &MockServer, timeout: Duration) -> HttpClassifier {
    let config = ServerConfig::builder()
        .classifier_url(format!("{}/predict", server.uri()))
        .outbound_timeout(timeout)
        .build()
        .unwrap();
    HttpClassifier::new(&config.classifier).unwrap()
}

#[tokio::test]
async fn test_text_is_sent_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({ "text": "have a nice day" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predicted_label": "not_cyberbullying",
            "confidence": 0.98
        })))
        .expect(1)
        .mount(&server)
        .await;

    let classifier = classifier_for(&server, Duration::from_secs(5));
    let verdict = classifier
        .classify(ClassifierInput::Text("have a nice day"))
        .await
        .unwrap();

    assert_eq!(verdict.label, "not_cyberbullying");
    assert_eq!(verdict.confidence, Some(0.98));
    assert!(!verdict.is_violation("cyberbullying"));
}

#[tokio::test]
async fn test_file_is_sent_as_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"meme.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predicted_label": "cyberbullying"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let attachment =
        Attachment::new("meme.png", "image/png", Bytes::from_static(b"PNGDATA")).unwrap();
    let classifier = classifier_for(&server, Duration::from_secs(5));
    let verdict = classifier
        .classify(ClassifierInput::File(&attachment))
        .await
        .unwrap();

    assert!(verdict.is_violation("cyberbullying"));
    assert_eq!(verdict.confidence, None);
}

#[tokio::test]
async fn test_error_status_passes_message_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "message": "Model is loading" })),
        )
        .mount(&server)
        .await;

    let classifier = classifier_for(&server, Duration::from_secs(5));
    let err = classifier
        .classify(ClassifierInput::Text("hello"))
        .await
        .unwrap_err();

    assert_matches!(err, ClassifierError::Status { status: 503, .. });
    assert_eq!(err.client_message(), "Model is loading");
}

#[tokio::test]
async fn test_error_status_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let classifier = classifier_for(&server, Duration::from_secs(5));
    let err = classifier
        .classify(ClassifierInput::Text("hello"))
        .await
        .unwrap_err();

    assert_eq!(err.client_message(), "Classifier returned status 500");
}

#[tokio::test]
async fn test_malformed_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "label": "ok" })))
        .mount(&server)
        .await;

    let classifier = classifier_for(&server, Duration::from_secs(5));
    let err = classifier
        .classify(ClassifierInput::Text("hello"))
        .await
        .unwrap_err();

    assert_matches!(err, ClassifierError::Malformed(_));
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "predicted_label": "not_cyberbullying" }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let classifier = classifier_for(&server, Duration::from_millis(50));
    let err = classifier
        .classify(ClassifierInput::Text("hello"))
        .await
        .unwrap_err();

    assert_matches!(err, ClassifierError::Request(_));
    assert_eq!(err.client_message(), "Content analysis timed out");
}
