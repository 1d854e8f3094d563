//! Session gateway end-to-end tests
//!
//! Boots the real router on an ephemeral port and drives it with a WebSocket
//! client, asserting the acknowledgement contract for every event type.

use std::path::PathBuf;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use time::format_description::well_known::Rfc3339;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use lingo_gateway::{SceneCatalog, ServerConfig, config::Environment, routes, state::AppState};

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Start the full application on an ephemeral port; returns the ws URL.
async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: addr.port(),
        environment: Environment::Development,
        secret_key: "test-secret".to_string(),
        no_tls: true,
        cert_dir: PathBuf::from("certs"),
        production_cert_dir: PathBuf::from("/etc/certs"),
        cors_allowed_origins: Some("*".to_string()),
    };
    let state = AppState::new(config, SceneCatalog::builtin());
    let app = routes::api::create_api_router()
        .merge(routes::session::create_session_router())
        .with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });

    format!("ws://{addr}/ws/socket.io")
}

async fn connect(url: &str) -> WsClient {
    let (socket, _) = connect_async(url).await.expect("WebSocket connect failed");
    socket
}

/// Read frames until the next text frame and parse it as JSON.
async fn next_json(socket: &mut WsClient) -> Value {
    loop {
        let message = socket
            .next()
            .await
            .expect("connection closed unexpectedly")
            .expect("WebSocket read failed");
        if message.is_text() {
            let text = message.into_text().unwrap();
            return serde_json::from_str(&text).unwrap();
        }
    }
}

async fn send_json(socket: &mut WsClient, value: Value) {
    socket
        .send(Message::Text(value.to_string().into()))
        .await
        .expect("WebSocket send failed");
}

/// The first frame after the upgrade is the connection greeting
#[tokio::test]
async fn test_connection_established_greeting() {
    let url = spawn_server().await;
    let mut socket = connect(&url).await;

    let greeting = next_json(&mut socket).await;
    assert_eq!(greeting["event"], "connection_established");
    assert_eq!(greeting["data"]["status"], "connected");

    let timestamp = greeting["data"]["timestamp"].as_str().unwrap();
    assert!(
        time::OffsetDateTime::parse(timestamp, &Rfc3339).is_ok(),
        "timestamp {timestamp:?} should be RFC 3339"
    );
}

/// The end-to-end scene selection exchange from the protocol contract
#[tokio::test]
async fn test_select_scene_role_echo() {
    let url = spawn_server().await;
    let mut socket = connect(&url).await;
    let _greeting = next_json(&mut socket).await;

    send_json(
        &mut socket,
        json!({
            "event": "select_scene_role",
            "data": {"scene": "restaurant", "user_role": "customer", "ai_role": "waiter"}
        }),
    )
    .await;

    let reply = next_json(&mut socket).await;
    assert_eq!(reply["event"], "scene_role_confirmed");
    assert_eq!(reply["data"]["scene"], "restaurant");
    assert_eq!(reply["data"]["user_role"], "customer");
    assert_eq!(reply["data"]["ai_role"], "waiter");
    assert_eq!(reply["data"]["status"], "ready");
}

/// Missing selection fields come back as null rather than an error
#[tokio::test]
async fn test_partial_selection_echoes_null() {
    let url = spawn_server().await;
    let mut socket = connect(&url).await;
    let _greeting = next_json(&mut socket).await;

    send_json(
        &mut socket,
        json!({"event": "select_scene_role", "data": {"scene": "hotel"}}),
    )
    .await;

    let reply = next_json(&mut socket).await;
    assert_eq!(reply["event"], "scene_role_confirmed");
    assert_eq!(reply["data"]["scene"], "hotel");
    assert!(reply["data"]["user_role"].is_null());
    assert!(reply["data"]["ai_role"].is_null());
    assert_eq!(reply["data"]["status"], "ready");
}

/// start_session always acknowledges active, stop_session inactive
#[tokio::test]
async fn test_session_start_stop() {
    let url = spawn_server().await;
    let mut socket = connect(&url).await;
    let _greeting = next_json(&mut socket).await;

    send_json(&mut socket, json!({"event": "start_session"})).await;
    let started = next_json(&mut socket).await;
    assert_eq!(started["event"], "session_status");
    assert_eq!(started["data"]["status"], "active");

    send_json(&mut socket, json!({"event": "stop_session"})).await;
    let stopped = next_json(&mut socket).await;
    assert_eq!(stopped["event"], "session_status");
    assert_eq!(stopped["data"]["status"], "inactive");

    // Stopping again still acknowledges inactive; there is no session state
    send_json(&mut socket, json!({"event": "stop_session"})).await;
    let stopped_again = next_json(&mut socket).await;
    assert_eq!(stopped_again["data"]["status"], "inactive");
}

/// audio_data events and raw binary frames are both acknowledged
#[tokio::test]
async fn test_audio_is_acknowledged() {
    let url = spawn_server().await;
    let mut socket = connect(&url).await;
    let _greeting = next_json(&mut socket).await;

    send_json(
        &mut socket,
        json!({"event": "audio_data", "data": {"chunk": "AAAA", "seq": 1}}),
    )
    .await;
    let reply = next_json(&mut socket).await;
    assert_eq!(reply["event"], "audio_received");
    assert_eq!(reply["data"]["status"], "received");

    socket
        .send(Message::Binary(vec![0u8; 320].into()))
        .await
        .unwrap();
    let binary_reply = next_json(&mut socket).await;
    assert_eq!(binary_reply["event"], "audio_received");
    assert_eq!(binary_reply["data"]["status"], "received");
}

/// Unknown events are dropped without a reply; the channel stays usable
#[tokio::test]
async fn test_unknown_event_is_ignored() {
    let url = spawn_server().await;
    let mut socket = connect(&url).await;
    let _greeting = next_json(&mut socket).await;

    send_json(&mut socket, json!({"event": "warp_drive", "data": {}})).await;
    send_json(&mut socket, json!({"event": "start_session"})).await;

    // The first reply corresponds to start_session, proving the unknown
    // event produced nothing.
    let reply = next_json(&mut socket).await;
    assert_eq!(reply["event"], "session_status");
    assert_eq!(reply["data"]["status"], "active");
}

/// One reply per event, in the order the events were sent
#[tokio::test]
async fn test_replies_preserve_order() {
    let url = spawn_server().await;
    let mut socket = connect(&url).await;
    let _greeting = next_json(&mut socket).await;

    send_json(
        &mut socket,
        json!({"event": "select_scene_role", "data": {"scene": "airport", "user_role": "passenger", "ai_role": "staff"}}),
    )
    .await;
    send_json(&mut socket, json!({"event": "start_session"})).await;
    send_json(&mut socket, json!({"event": "stop_session"})).await;

    assert_eq!(next_json(&mut socket).await["event"], "scene_role_confirmed");
    assert_eq!(next_json(&mut socket).await["data"]["status"], "active");
    assert_eq!(next_json(&mut socket).await["data"]["status"], "inactive");
}

/// Two concurrent clients each get their own acknowledgements
#[tokio::test]
async fn test_connections_are_isolated() {
    let url = spawn_server().await;

    let mut first = connect(&url).await;
    let mut second = connect(&url).await;
    let _ = next_json(&mut first).await;
    let _ = next_json(&mut second).await;

    send_json(&mut first, json!({"event": "start_session"})).await;
    let reply = next_json(&mut first).await;
    assert_eq!(reply["data"]["status"], "active");

    // The second connection saw nothing; its next exchange starts fresh
    send_json(&mut second, json!({"event": "stop_session"})).await;
    let other = next_json(&mut second).await;
    assert_eq!(other["event"], "session_status");
    assert_eq!(other["data"]["status"], "inactive");
}
