//! Test helpers for integration tests
//!
//! Provides a self-contained test server, HTTP request helpers and a
//! WebSocket stream client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chat_common::AppConfig;
use chat_core::RoomId;
use chat_db::{InMemoryMessageRepository, InMemorySessionStore};
use chat_gateway::{GatewayState, StreamEvent};
use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{
    self, client::IntoClientRequest, http::HeaderValue, protocol::CloseFrame, Message,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::fixtures::{ALICE, ALICE_TOKEN, BOB, BOB_TOKEN, EXPIRED_TOKEN, LOBBY, ROOM_42};

/// Client side of a room stream
pub type StreamClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: GatewayState,
    pub sessions: Arc<InMemorySessionStore>,
    pub messages: Arc<InMemoryMessageRepository>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Start a server with rooms `lobby` and `room-42` and users alice and bob
    pub async fn start() -> Result<Self> {
        Self::start_with_buffer(64).await
    }

    /// Start a server whose subscribers buffer `buffer` events
    pub async fn start_with_buffer(buffer: usize) -> Result<Self> {
        let config = test_config(buffer)?;

        let sessions = Arc::new(InMemorySessionStore::new());
        sessions.insert_session(ALICE_TOKEN, ALICE, chrono::Duration::hours(1));
        sessions.insert_session(BOB_TOKEN, BOB, chrono::Duration::hours(1));
        sessions.insert_session(EXPIRED_TOKEN, ALICE, chrono::Duration::hours(-1));

        let messages = Arc::new(InMemoryMessageRepository::new());
        for room in [LOBBY, ROOM_42] {
            messages.add_room(RoomId::parse(room)?);
        }
        messages.add_user(ALICE, "alice");
        messages.add_user(BOB, "bob");

        let state = GatewayState::new(config, sessions.clone(), messages.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let (shutdown, signal) = oneshot::channel::<()>();
        let server_state = state.clone();
        let handle = tokio::spawn(async move {
            let signal = async move {
                let _ = signal.await;
            };
            if let Err(e) = chat_gateway::serve(listener, server_state, signal).await {
                eprintln!("test server failed: {e}");
            }
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            sessions,
            messages,
            shutdown: Some(shutdown),
            handle: Some(handle),
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn with_session(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.header(reqwest::header::COOKIE, format!("session={token}")),
            None => builder,
        }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(Self::with_session(self.client.get(&url), token).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(Self::with_session(self.client.post(&url), token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a PATCH request with JSON body
    pub async fn patch<T: Serialize>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(Self::with_session(self.client.patch(&url), token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(Self::with_session(self.client.delete(&url), token)
            .send()
            .await?)
    }

    /// Open a room stream
    pub async fn connect_stream(&self, room: &str, token: Option<&str>) -> Result<StreamClient> {
        let url = format!("ws://{}/rooms/{room}/stream", self.addr);
        let mut request = url.into_client_request()?;
        if let Some(token) = token {
            request
                .headers_mut()
                .insert("cookie", HeaderValue::from_str(&format!("session={token}"))?);
        }

        let (stream, _) = tokio_tungstenite::connect_async(request).await?;
        Ok(stream)
    }

    /// Open a room stream that is expected to be refused; returns the HTTP status
    pub async fn refused_stream_status(&self, room: &str, token: Option<&str>) -> Result<u16> {
        match self.connect_stream(room, token).await {
            Ok(_) => bail!("stream to {room} was accepted"),
            Err(e) => match e.downcast::<tungstenite::Error>()? {
                tungstenite::Error::Http(response) => Ok(response.status().as_u16()),
                other => bail!("unexpected handshake failure: {other}"),
            },
        }
    }

    /// Wait until `room` has exactly `count` subscribers
    pub async fn wait_for_subscribers(&self, room: &str, count: usize) -> Result<()> {
        let room = RoomId::parse(room)?;
        tokio::time::timeout(EVENT_TIMEOUT, async {
            while self.state.registry().subscriber_count(&room) != count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .with_context(|| format!("room {room} never reached {count} subscribers"))
    }

    /// Stop accepting connections and end open streams
    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            tokio::time::timeout(EVENT_TIMEOUT, handle).await??;
        }
        Ok(())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Configuration for an in-memory server on an ephemeral port
pub fn test_config(buffer: usize) -> Result<AppConfig> {
    let buffer = buffer.to_string();
    AppConfig::from_lookup(|key| match key {
        "STORAGE_BACKEND" => Some("memory".to_string()),
        "SERVER_PORT" => Some("0".to_string()),
        "SUBSCRIBER_BUFFER" => Some(buffer.clone()),
        _ => None,
    })
    .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Read the next stream event, skipping control frames
pub async fn next_event(stream: &mut StreamClient) -> Result<StreamEvent> {
    loop {
        let frame = tokio::time::timeout(EVENT_TIMEOUT, stream.next())
            .await
            .context("timed out waiting for a stream event")?
            .context("stream ended")??;

        match frame {
            Message::Text(text) => return Ok(serde_json::from_str::<StreamEvent>(&text)?),
            Message::Close(frame) => bail!("stream closed: {frame:?}"),
            _ => {}
        }
    }
}

/// Read frames until the server closes the stream; returns its close frame
pub async fn next_close(stream: &mut StreamClient) -> Result<Option<CloseFrame<'static>>> {
    loop {
        let frame = tokio::time::timeout(EVENT_TIMEOUT, stream.next())
            .await
            .context("timed out waiting for close")?;

        match frame {
            Some(Ok(Message::Close(frame))) => return Ok(frame),
            Some(Ok(_)) => {}
            Some(Err(e)) => bail!("stream failed before close: {e}"),
            None => return Ok(None),
        }
    }
}

/// Assert that no event arrives within `wait`
pub async fn assert_silent(stream: &mut StreamClient, wait: Duration) -> Result<()> {
    match tokio::time::timeout(wait, stream.next()).await {
        Err(_) => Ok(()),
        Ok(Some(Ok(Message::Text(text)))) => bail!("unexpected event: {text}"),
        Ok(other) => bail!("unexpected frame: {other:?}"),
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
