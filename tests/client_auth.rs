//! Session lifecycle behavior of the request pipeline against a mock
//! server: auth-failure teardown, the login/signup exemption, and
//! session establishment.

use std::sync::{Arc, Mutex};

use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tallybook::api::{ApiClient, ApiError};
use tallybook::auth::SessionStore;
use tallybook::models::ExpenseFilter;
use tallybook::notify::{notice_channel, EndReason, NoticeReceiver, SessionNotice};

fn make_client(
    uri: &str,
    session: Option<(&str, &str)>,
) -> (ApiClient, Arc<Mutex<SessionStore>>, NoticeReceiver) {
    let mut store = SessionStore::in_memory();
    if let Some((token, username)) = session {
        store.save(token, username).unwrap();
    }
    let store = Arc::new(Mutex::new(store));
    let (tx, rx) = notice_channel();
    let client = ApiClient::new(uri, Arc::clone(&store))
        .unwrap()
        .with_notices(tx);
    (client, store, rx)
}

#[tokio::test]
async fn test_unauthorized_data_request_tears_down_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/expenses"))
        .and(header("Authorization", "Bearer stale-token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "Unauthorized"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store, mut notices) = make_client(&server.uri(), Some(("stale-token", "alice")));

    let result = client.expenses(&ExpenseFilter::default()).await;
    assert!(matches!(result, Err(ApiError::AuthExpired)));

    // The store is empty by the time the error reaches the caller.
    assert!(!store.lock().unwrap().is_active());
    assert_eq!(
        notices.try_recv().unwrap(),
        SessionNotice::Ended(EndReason::Expired)
    );
    // Exactly one teardown notification.
    assert!(notices.try_recv().is_err());
}

#[tokio::test]
async fn test_unauthorized_login_does_not_tear_down() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "Invalid username or password"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // An existing session must survive somebody fumbling the login form.
    let (client, store, mut notices) = make_client(&server.uri(), Some(("tok", "alice")));

    let result = client.login("alice", "wrong").await;
    match result {
        Err(ApiError::RequestFailed { message }) => {
            assert_eq!(message, "Invalid username or password");
        }
        other => panic!("expected RequestFailed, got {:?}", other.map(|_| ())),
    }

    assert!(store.lock().unwrap().is_active());
    assert_eq!(store.lock().unwrap().token(), Some("tok"));
    assert!(notices.try_recv().is_err());
}

#[tokio::test]
async fn test_unauthorized_signup_is_request_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/signup"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "Signups disabled"
        })))
        .mount(&server)
        .await;

    let (client, store, _notices) = make_client(&server.uri(), None);
    let result = client.signup("mallory", "pw").await;
    assert!(matches!(result, Err(ApiError::RequestFailed { .. })));
    assert!(!store.lock().unwrap().is_active());
}

#[tokio::test]
async fn test_login_establishes_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(serde_json::json!({
            "username": "alice",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "fresh-token",
            "username": "alice"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store, mut notices) = make_client(&server.uri(), None);

    let username = client.login("alice", "hunter2").await.unwrap();
    assert_eq!(username, "alice");

    let store = store.lock().unwrap();
    assert_eq!(store.token(), Some("fresh-token"));
    assert_eq!(store.username(), Some("alice"));
    assert_eq!(
        notices.try_recv().unwrap(),
        SessionNotice::Established {
            username: "alice".to_string()
        }
    );
}

#[tokio::test]
async fn test_signup_establishes_session() {
    let server = MockServer::start().await;
    // The server answers signup with 201.
    Mock::given(method("POST"))
        .and(path("/api/signup"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "token": "new-token",
            "username": "bob"
        })))
        .mount(&server)
        .await;

    let (client, store, mut notices) = make_client(&server.uri(), None);
    client.signup("bob", "secret").await.unwrap();

    assert_eq!(store.lock().unwrap().token(), Some("new-token"));
    assert!(matches!(
        notices.try_recv().unwrap(),
        SessionNotice::Established { .. }
    ));
}

#[tokio::test]
async fn test_logout_clears_session_and_notifies() {
    let server = MockServer::start().await;
    let (client, store, mut notices) = make_client(&server.uri(), Some(("tok", "alice")));

    client.logout();

    assert!(!store.lock().unwrap().is_active());
    assert_eq!(
        notices.try_recv().unwrap(),
        SessionNotice::Ended(EndReason::LoggedOut)
    );
}

#[tokio::test]
async fn test_verify_session_live_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["Food"])))
        .mount(&server)
        .await;

    let (client, store, _notices) = make_client(&server.uri(), Some(("tok", "alice")));
    assert!(client.verify_session().await.unwrap());
    assert!(store.lock().unwrap().is_active());
}

#[tokio::test]
async fn test_verify_session_rejected_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let (client, store, mut notices) = make_client(&server.uri(), Some(("dead-tok", "alice")));
    assert!(!client.verify_session().await.unwrap());
    assert!(!store.lock().unwrap().is_active());
    assert_eq!(
        notices.try_recv().unwrap(),
        SessionNotice::Ended(EndReason::Expired)
    );
}
