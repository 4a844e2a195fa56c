//! Room stream integration tests
//!
//! Run with: cargo test -p integration-tests --test stream_tests

use std::time::Duration;

use chat_core::{ChangeKind, RoomId};
use chat_gateway::CloseCode;
use integration_tests::*;
use reqwest::StatusCode;

async fn post(server: &TestServer, room: &str, token: &str, content: &str) -> MessageBody {
    let response = server
        .post(
            &format!("/rooms/{room}/messages"),
            Some(token),
            &ContentBody::new(content),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

#[tokio::test]
async fn test_stream_refused_without_valid_session() {
    let server = TestServer::start().await.unwrap();

    for token in [None, Some("made-up"), Some(EXPIRED_TOKEN)] {
        let status = server.refused_stream_status(LOBBY, token).await.unwrap();
        assert_eq!(status, 401);
    }

    assert_eq!(server.state.registry().room_count(), 0);
}

#[tokio::test]
async fn test_stream_to_unknown_room_is_refused() {
    let server = TestServer::start().await.unwrap();

    let status = server
        .refused_stream_status("ghost", Some(ALICE_TOKEN))
        .await
        .unwrap();

    assert_eq!(status, 404);
    assert_eq!(server.state.registry().room_count(), 0);
}

#[tokio::test]
async fn test_stream_receives_message_changes() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.connect_stream(LOBBY, Some(ALICE_TOKEN)).await.unwrap();
    server.wait_for_subscribers(LOBBY, 1).await.unwrap();

    let created = post(&server, LOBBY, BOB_TOKEN, "hi alice").await;
    let event = next_event(&mut alice).await.unwrap();
    assert_eq!(event.kind, ChangeKind::Created);
    assert_eq!(event.message.uuid, created.uuid);
    assert_eq!(event.message.content, "hi alice");
    assert_eq!(event.message.author.name, "bob");

    let response = server
        .patch(
            &format!("/rooms/{LOBBY}/messages/{}", created.uuid),
            Some(BOB_TOKEN),
            &ContentBody::new("hi again"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let event = next_event(&mut alice).await.unwrap();
    assert_eq!(event.kind, ChangeKind::Updated);
    assert_eq!(event.message.content, "hi again");

    let response = server
        .delete(
            &format!("/rooms/{LOBBY}/messages/{}", created.uuid),
            Some(BOB_TOKEN),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let event = next_event(&mut alice).await.unwrap();
    assert_eq!(event.kind, ChangeKind::Deleted);
    assert_eq!(event.message.uuid, created.uuid);
}

#[tokio::test]
async fn test_streams_only_see_their_room() {
    let server = TestServer::start().await.unwrap();
    let mut lobby = server.connect_stream(LOBBY, Some(ALICE_TOKEN)).await.unwrap();
    let mut room_42 = server.connect_stream(ROOM_42, Some(BOB_TOKEN)).await.unwrap();
    server.wait_for_subscribers(LOBBY, 1).await.unwrap();
    server.wait_for_subscribers(ROOM_42, 1).await.unwrap();

    post(&server, ROOM_42, ALICE_TOKEN, "for room 42").await;

    let event = next_event(&mut room_42).await.unwrap();
    assert_eq!(event.message.content, "for room 42");
    assert_silent(&mut lobby, Duration::from_millis(200)).await.unwrap();
}

#[tokio::test]
async fn test_events_arrive_in_order() {
    let server = TestServer::start().await.unwrap();
    let mut stream = server.connect_stream(LOBBY, Some(ALICE_TOKEN)).await.unwrap();
    server.wait_for_subscribers(LOBBY, 1).await.unwrap();

    for i in 0..10 {
        post(&server, LOBBY, BOB_TOKEN, &format!("m{i}")).await;
    }

    for i in 0..10 {
        let event = next_event(&mut stream).await.unwrap();
        assert_eq!(event.message.content, format!("m{i}"));
    }
}

#[tokio::test]
async fn test_room_42_scenario() {
    let server = TestServer::start().await.unwrap();
    let room = RoomId::parse(ROOM_42).unwrap();

    let mut a = server.connect_stream(ROOM_42, Some(ALICE_TOKEN)).await.unwrap();
    let mut b = server.connect_stream(ROOM_42, Some(BOB_TOKEN)).await.unwrap();
    server.wait_for_subscribers(ROOM_42, 2).await.unwrap();

    post(&server, ROOM_42, ALICE_TOKEN, "hi").await;
    assert_eq!(next_event(&mut a).await.unwrap().message.content, "hi");
    assert_eq!(next_event(&mut b).await.unwrap().message.content, "hi");

    b.close(None).await.unwrap();
    server.wait_for_subscribers(ROOM_42, 1).await.unwrap();

    post(&server, ROOM_42, ALICE_TOKEN, "bye").await;
    assert_eq!(next_event(&mut a).await.unwrap().message.content, "bye");

    a.close(None).await.unwrap();
    server.wait_for_subscribers(ROOM_42, 0).await.unwrap();
    assert!(!server.state.registry().contains_room(&room));
}

#[tokio::test]
async fn test_dropped_connection_is_cleaned_up() {
    let server = TestServer::start().await.unwrap();
    let stream = server.connect_stream(LOBBY, Some(ALICE_TOKEN)).await.unwrap();
    server.wait_for_subscribers(LOBBY, 1).await.unwrap();

    drop(stream);

    server.wait_for_subscribers(LOBBY, 0).await.unwrap();
    assert_eq!(server.state.registry().room_count(), 0);
}

#[tokio::test]
async fn test_slow_consumer_is_evicted_with_close_code() {
    let server = TestServer::start_with_buffer(1).await.unwrap();
    let room = RoomId::parse(LOBBY).unwrap();
    let mut stream = server.connect_stream(LOBBY, Some(ALICE_TOKEN)).await.unwrap();
    server.wait_for_subscribers(LOBBY, 1).await.unwrap();

    // Never read until evicted: socket buffers fill, then the one-slot channel
    let bulky = "あ".repeat(2000);
    let mut posted = 0;
    while server.state.registry().subscriber_count(&room) > 0 {
        assert!(posted < 20_000, "subscriber was never evicted");
        post(&server, LOBBY, BOB_TOKEN, &bulky).await;
        posted += 1;
    }
    assert_eq!(server.state.registry().room_count(), 0);

    let frame = next_close(&mut stream).await.unwrap().expect("close frame");
    assert_eq!(u16::from(frame.code), CloseCode::SlowConsumer.as_u16());
    assert!(!server.state.registry().contains_room(&room));
}

#[tokio::test]
async fn test_shutdown_closes_open_streams() {
    let mut server = TestServer::start().await.unwrap();
    let mut stream = server.connect_stream(LOBBY, Some(ALICE_TOKEN)).await.unwrap();
    server.wait_for_subscribers(LOBBY, 1).await.unwrap();

    server.shutdown().await.unwrap();

    let frame = next_close(&mut stream).await.unwrap().expect("close frame");
    assert_eq!(u16::from(frame.code), CloseCode::ServerShutdown.as_u16());
    assert_eq!(server.state.registry().room_count(), 0);
}
