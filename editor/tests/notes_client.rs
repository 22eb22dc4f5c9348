use std::time::Duration;

use jotter::clients::{ApiConfig, ApiError, HttpNotesClient, NotesApi};
use jotter::{CategoryId, NoteId, NotePayload};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, token: Option<&str>) -> HttpNotesClient {
    HttpNotesClient::new(ApiConfig {
        base_url: server.uri(),
        access_token: token.map(|t| SecretString::from(t.to_string())),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn payload() -> NotePayload {
    NotePayload {
        title: "Groceries".to_string(),
        content: "Buy eggs".to_string(),
        category: CategoryId::new("c1"),
    }
}

fn note_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Groceries",
        "content": "Buy eggs",
        "category": "c1",
        "category_name": "Personal",
        "category_color": "#ffcc00",
        "category_slug": "personal",
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:05:00Z"
    })
}

#[tokio::test]
async fn test_create_note_posts_payload_with_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/notes/notes/"))
        .and(header("Authorization", "Bearer test_token"))
        .and(body_json(json!({
            "title": "Groceries",
            "content": "Buy eggs",
            "category": "c1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(note_json("n-1")))
        .expect(1)
        .mount(&server)
        .await;

    let note = client(&server, Some("test_token"))
        .create_note(&payload())
        .await
        .unwrap();

    assert_eq!(note.id, NoteId::new("n-1"));
    assert_eq!(note.category_name, "Personal");
    assert_eq!(note.updated_at.to_rfc3339(), "2024-05-01T10:05:00+00:00");
}

#[tokio::test]
async fn test_update_note_puts_to_note_url() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/notes/notes/42/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(note_json("42")))
        .expect(1)
        .mount(&server)
        .await;

    let note = client(&server, None)
        .update_note(&NoteId::new("42"), &payload())
        .await
        .unwrap();
    assert_eq!(note.id.as_str(), "42");
}

#[tokio::test]
async fn test_fetch_missing_note_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/notes/notes/7/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .fetch_note(&NoteId::new("7"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(err.user_message(), "This note no longer exists.");
}

#[tokio::test]
async fn test_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/notes/notes/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server, Some("expired"))
        .create_note(&payload())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn test_field_errors_are_rejections() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/notes/notes/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": ["Ensure this field has no more than 200 characters."],
            "category": ["Invalid pk \"zz\" - object does not exist."]
        })))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .create_note(&payload())
        .await
        .unwrap_err();
    match err {
        ApiError::Rejected(errors) => {
            assert_eq!(errors.len(), 2);
            assert_eq!(
                errors.joined("title").as_deref(),
                Some("Ensure this field has no more than 200 characters.")
            );
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_bad_request_without_field_errors_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/notes/notes/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "detail": "Malformed" })))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .create_note(&payload())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 400, .. }));
}

#[tokio::test]
async fn test_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/notes/notes/42/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .update_note(&NoteId::new("42"), &payload())
        .await
        .unwrap_err();
    match &err {
        ApiError::Status { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Status, got {:?}", other),
    }
    assert_eq!(
        err.user_message(),
        "An unexpected error occurred. Please try again."
    );
}

#[tokio::test]
async fn test_undecodable_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/notes/notes/42/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .fetch_note(&NoteId::new("42"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = HttpNotesClient::new(ApiConfig {
        base_url: uri,
        access_token: None,
        timeout: Duration::from_secs(2),
    })
    .unwrap();

    let err = client.create_note(&payload()).await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(
        err.user_message(),
        "Unable to connect to server. Please check your connection or try again later."
    );
}
