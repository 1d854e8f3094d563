//! Session gateway WebSocket handler
//!
//! Upgrades the HTTP connection and runs the per-client event loop. The
//! contract is strict request/acknowledge: every recognized inbound event
//! produces exactly one outbound event on the same connection, sent from the
//! receive loop before the next message is read. Handlers never block on
//! external services.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt, stream::SplitSink};
use time::format_description::well_known::Rfc3339;
use tracing::{debug, error, info, warn};

use crate::state::{AppState, Connection};

use super::messages::{IncomingEvent, OutgoingEvent, SceneSelection};

/// Maximum WebSocket frame size (1 MB)
const MAX_WS_FRAME_SIZE: usize = 1024 * 1024;

/// Maximum WebSocket message size (1 MB)
const MAX_WS_MESSAGE_SIZE: usize = 1024 * 1024;

const SESSION_STARTED_MESSAGE: &str = "Session started (voice pipeline not yet attached)";
const SESSION_STOPPED_MESSAGE: &str = "Session stopped";
const AUDIO_RECEIVED_MESSAGE: &str = "Audio received (no processing attached)";

/// Session WebSocket handler
///
/// Upgrades the HTTP connection to a WebSocket and hands it to the
/// per-connection event loop.
pub async fn session_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.max_frame_size(MAX_WS_FRAME_SIZE)
        .max_message_size(MAX_WS_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_session_socket(socket, state))
}

/// Run one client's connection: greet, register, dispatch until close.
async fn handle_session_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection = Connection::open();
    info!(connection_id = %connection.id, "Client connected");

    let (mut sender, mut receiver) = socket.split();

    let greeting = OutgoingEvent::ConnectionEstablished {
        status: "connected".to_string(),
        timestamp: connect_timestamp(&connection),
    };
    if send_event(&mut sender, &greeting).await.is_err() {
        return;
    }
    state.register_connection(connection.clone());

    while let Some(message) = receiver.next().await {
        match message {
            Ok(message) => {
                let continue_processing =
                    process_session_message(message, &connection, &state, &mut sender).await;
                if !continue_processing {
                    break;
                }
            }
            Err(e) => {
                warn!(connection_id = %connection.id, "WebSocket error: {e}");
                break;
            }
        }
    }

    state.remove_connection(&connection.id);
    info!(connection_id = %connection.id, "Client disconnected");
}

/// Process one inbound WebSocket message. Returns false when the loop should
/// end.
async fn process_session_message(
    message: Message,
    connection: &Connection,
    state: &Arc<AppState>,
    sender: &mut SplitSink<WebSocket, Message>,
) -> bool {
    match message {
        Message::Text(text) => {
            let event: IncomingEvent = match serde_json::from_str(&text) {
                Ok(event) => event,
                Err(e) => {
                    // Unknown event names and malformed payloads are dropped
                    // without a reply; nothing is surfaced to the peer.
                    debug!(connection_id = %connection.id, "Ignoring unrecognized message: {e}");
                    return true;
                }
            };
            let reply = dispatch_event(event, connection, state);
            send_event(sender, &reply).await.is_ok()
        }
        Message::Binary(data) => {
            // Raw frames are treated as audio chunks and acknowledged the
            // same way as the audio_data event.
            debug!(
                connection_id = %connection.id,
                "Binary audio frame received: {} bytes",
                data.len()
            );
            send_event(sender, &audio_ack()).await.is_ok()
        }
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            debug!(connection_id = %connection.id, "Close frame received");
            false
        }
    }
}

/// Map one inbound event to its acknowledgement.
fn dispatch_event(
    event: IncomingEvent,
    connection: &Connection,
    state: &AppState,
) -> OutgoingEvent {
    match event {
        IncomingEvent::SelectSceneRole(selection) => {
            handle_scene_selection(selection, connection, state)
        }
        IncomingEvent::StartSession => {
            info!(connection_id = %connection.id, "Session start requested");
            OutgoingEvent::SessionStatus {
                status: "active".to_string(),
                message: SESSION_STARTED_MESSAGE.to_string(),
            }
        }
        IncomingEvent::StopSession => {
            info!(connection_id = %connection.id, "Session stop requested");
            OutgoingEvent::SessionStatus {
                status: "inactive".to_string(),
                message: SESSION_STOPPED_MESSAGE.to_string(),
            }
        }
        IncomingEvent::AudioData(_) => {
            debug!(connection_id = %connection.id, "Audio data received");
            audio_ack()
        }
    }
}

fn handle_scene_selection(
    selection: SceneSelection,
    connection: &Connection,
    state: &AppState,
) -> OutgoingEvent {
    info!(
        connection_id = %connection.id,
        scene = selection.scene.as_deref().unwrap_or("<none>"),
        user_role = selection.user_role.as_deref().unwrap_or("<none>"),
        ai_role = selection.ai_role.as_deref().unwrap_or("<none>"),
        "Scene selected"
    );

    // Any selection is accepted and echoed; ids outside the catalog are
    // logged only.
    if let Some(scene) = &selection.scene {
        if !state.catalog.contains(scene) {
            warn!(
                connection_id = %connection.id,
                scene = %scene,
                "Selected scene is not in the catalog"
            );
        }
    }

    OutgoingEvent::SceneRoleConfirmed {
        scene: selection.scene,
        user_role: selection.user_role,
        ai_role: selection.ai_role,
        status: "ready".to_string(),
    }
}

fn audio_ack() -> OutgoingEvent {
    OutgoingEvent::AudioReceived {
        status: "received".to_string(),
        message: AUDIO_RECEIVED_MESSAGE.to_string(),
    }
}

fn connect_timestamp(connection: &Connection) -> String {
    connection.connected_at.format(&Rfc3339).unwrap_or_default()
}

async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &OutgoingEvent,
) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(json) => sender.send(Message::Text(json.into())).await,
        Err(e) => {
            error!("Failed to serialize outgoing event: {e}");
            Ok(())
        }
    }
}
