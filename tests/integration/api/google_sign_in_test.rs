//! Google sign-in through the router, with Google's endpoints on wiremock

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestResponse;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use socialhub::backend::server::ServerConfig;

use crate::common::TestApp;

fn app_for(server: &MockServer) -> TestApp {
    TestApp::builder()
        .config(
            ServerConfig::builder()
                .google_base_url(server.uri())
                .build()
                .unwrap(),
        )
        .build()
}

fn set_cookies(response: &TestResponse) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn cookie_value(cookies: &[String], name: &str) -> Option<String> {
    cookies.iter().find_map(|c| {
        c.split(';')
            .next()
            .and_then(|pair| pair.strip_prefix(&format!("{}=", name)))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

async fn mount_google(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("code=auth-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "access-1" })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .and(header_eq("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sub": "google-42",
            "email": "ada@example.com",
            "name": "Ada Lovelace"
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_redirects_to_google_with_state_cookie() {
    let server = MockServer::start().await;
    let app = app_for(&server);

    let response = app.server.get("/auth/google").await;

    response.assert_status(StatusCode::SEE_OTHER);
    let location = reqwest::Url::parse(response.header("location").to_str().unwrap()).unwrap();
    assert_eq!(location.host_str(), Some("accounts.google.com"));
    let state = location
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap();

    let cookies = set_cookies(&response);
    assert_eq!(cookie_value(&cookies, "socialhub_oauth_state"), Some(state));
    crate::assert_contains!(cookies[0], "HttpOnly");
}

#[tokio::test]
async fn test_callback_sets_session_cookie_and_redirects_to_client() {
    let server = MockServer::start().await;
    mount_google(&server).await;
    let app = app_for(&server);

    let login = app.server.get("/auth/google").await;
    let state = cookie_value(&set_cookies(&login), "socialhub_oauth_state").unwrap();

    let response = app
        .server
        .get(&format!("/auth/google/callback?code=auth-code&state={}", state))
        .add_header(
            header::COOKIE,
            HeaderValue::from_str(&format!("socialhub_oauth_state={}", state)).unwrap(),
        )
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "http://localhost:3000");

    let cookies = set_cookies(&response);
    let session = cookies
        .iter()
        .find(|c| c.starts_with("socialhub_session="))
        .unwrap();
    crate::assert_contains!(session, "HttpOnly");
    crate::assert_contains!(session, "Max-Age=86400");
    let token = cookie_value(&cookies, "socialhub_session").unwrap();

    let check = app
        .server
        .get("/auth/check")
        .add_header(
            header::COOKIE,
            HeaderValue::from_str(&format!("socialhub_session={}", token)).unwrap(),
        )
        .await;
    check.assert_status_ok();
    let body: serde_json::Value = check.json();
    assert_eq!(body["name"], "Ada Lovelace");
    assert_eq!(body["email"], "ada@example.com");
}

#[tokio::test]
async fn test_callback_with_mismatched_state_fails_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = app_for(&server);

    let response = app
        .server
        .get("/auth/google/callback?code=auth-code&state=forged")
        .add_header(header::COOKIE, HeaderValue::from_static("socialhub_oauth_state=real"))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "http://localhost:3000/login");
    assert_eq!(cookie_value(&set_cookies(&response), "socialhub_session"), None);
}

#[tokio::test]
async fn test_callback_with_rejected_code_fails_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;
    let app = app_for(&server);

    let response = app
        .server
        .get("/auth/google/callback?code=bad&state=s1")
        .add_header(header::COOKIE, HeaderValue::from_static("socialhub_oauth_state=s1"))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "http://localhost:3000/login");
    assert_eq!(cookie_value(&set_cookies(&response), "socialhub_session"), None);
}
