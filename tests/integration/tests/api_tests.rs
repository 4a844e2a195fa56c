//! HTTP API integration tests
//!
//! Each test starts its own in-memory server on an ephemeral port.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::*;
use reqwest::StatusCode;

fn messages_path(room: &str) -> String {
    format!("/rooms/{room}/messages")
}

fn message_path(room: &str, uuid: uuid::Uuid) -> String {
    format!("/rooms/{room}/messages/{uuid}")
}

async fn post_message(server: &TestServer, token: &str, content: &str) -> MessageBody {
    let response = server
        .post(&messages_path(LOBBY), Some(token), &ContentBody::new(content))
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health", None).await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Session Gate Tests
// ============================================================================

#[tokio::test]
async fn test_post_without_session_is_rejected() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post(&messages_path(LOBBY), None, &ContentBody::new("hi"))
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();

    assert_eq!(body.error.code, "MISSING_SESSION");
    assert_eq!(server.messages.message_count(), 0);
}

#[tokio::test]
async fn test_expired_and_unknown_sessions_are_rejected() {
    let server = TestServer::start().await.unwrap();

    for token in [EXPIRED_TOKEN, "made-up"] {
        let response = server.get(&messages_path(LOBBY), Some(token)).await.unwrap();
        let body: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
        assert_eq!(body.error.code, "INVALID_SESSION");
    }
}

#[tokio::test]
async fn test_revoked_session_stops_working() {
    let server = TestServer::start().await.unwrap();
    post_message(&server, ALICE_TOKEN, "before").await;

    server.sessions.revoke(ALICE_TOKEN);

    let response = server
        .post(&messages_path(LOBBY), Some(ALICE_TOKEN), &ContentBody::new("after"))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(server.messages.message_count(), 1);
}

// ============================================================================
// Message Tests
// ============================================================================

#[tokio::test]
async fn test_create_message() {
    let server = TestServer::start().await.unwrap();

    let message = post_message(&server, ALICE_TOKEN, "hello").await;

    assert_eq!(message.content, "hello");
    assert_eq!(message.author.name, "alice");
}

#[tokio::test]
async fn test_create_message_validation() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post(&messages_path(LOBBY), Some(ALICE_TOKEN), &ContentBody::new(""))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post(
            &messages_path(LOBBY),
            Some(ALICE_TOKEN),
            &ContentBody::new("x".repeat(2001)),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_create_message_in_unknown_room() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post(&messages_path("ghost"), Some(ALICE_TOKEN), &ContentBody::new("hi"))
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "UNKNOWN_ROOM");
}

#[tokio::test]
async fn test_only_author_can_edit_or_delete() {
    let server = TestServer::start().await.unwrap();
    let message = post_message(&server, ALICE_TOKEN, "mine").await;

    let response = server
        .patch(
            &message_path(LOBBY, message.uuid),
            Some(BOB_TOKEN),
            &ContentBody::new("hijacked"),
        )
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "NOT_MESSAGE_AUTHOR");

    let response = server
        .delete(&message_path(LOBBY, message.uuid), Some(BOB_TOKEN))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_edit_then_delete() {
    let server = TestServer::start().await.unwrap();
    let message = post_message(&server, ALICE_TOKEN, "draft").await;

    let response = server
        .patch(
            &message_path(LOBBY, message.uuid),
            Some(ALICE_TOKEN),
            &ContentBody::new("final"),
        )
        .await
        .unwrap();
    let edited: MessageBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(edited.uuid, message.uuid);
    assert_eq!(edited.content, "final");
    assert_eq!(edited.timestamp, message.timestamp);

    let response = server
        .delete(&message_path(LOBBY, message.uuid), Some(ALICE_TOKEN))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .delete(&message_path(LOBBY, message.uuid), Some(ALICE_TOKEN))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_message_from_another_room_is_not_found() {
    let server = TestServer::start().await.unwrap();
    let message = post_message(&server, ALICE_TOKEN, "lobby only").await;

    let response = server
        .delete(&message_path(ROOM_42, message.uuid), Some(ALICE_TOKEN))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// History Tests
// ============================================================================

#[tokio::test]
async fn test_history_is_chronological() {
    let server = TestServer::start().await.unwrap();
    for content in ["one", "two", "three"] {
        post_message(&server, ALICE_TOKEN, content).await;
    }

    let response = server.get(&messages_path(LOBBY), Some(BOB_TOKEN)).await.unwrap();
    let history: Vec<MessageBody> = assert_json(response, StatusCode::OK).await.unwrap();
    let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "two", "three"]);

    let response = server
        .get(&format!("{}?offset=1", messages_path(LOBBY)), Some(BOB_TOKEN))
        .await
        .unwrap();
    let history: Vec<MessageBody> = assert_json(response, StatusCode::OK).await.unwrap();
    let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "two"]);
}

#[tokio::test]
async fn test_history_excludes_deleted() {
    let server = TestServer::start().await.unwrap();
    let keep = post_message(&server, ALICE_TOKEN, "keep").await;
    let gone = post_message(&server, ALICE_TOKEN, "gone").await;

    server
        .delete(&message_path(LOBBY, gone.uuid), Some(ALICE_TOKEN))
        .await
        .unwrap();

    let response = server.get(&messages_path(LOBBY), Some(ALICE_TOKEN)).await.unwrap();
    let history: Vec<MessageBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(history, vec![keep]);
}

#[tokio::test]
async fn test_history_rejects_negative_offset() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .get(&format!("{}?offset=-1", messages_path(LOBBY)), Some(ALICE_TOKEN))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}
