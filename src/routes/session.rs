//! Session WebSocket route configuration

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::session::session_handler;
use crate::state::AppState;
use std::sync::Arc;

/// Create the session gateway router
///
/// # Endpoint
///
/// `GET /ws/socket.io` - WebSocket upgrade for the bidirectional session
/// channel
///
/// # Protocol
///
/// After the upgrade the server sends `connection_established`, then
/// acknowledges each client event (`select_scene_role`, `start_session`,
/// `stop_session`, `audio_data`) with exactly one reply event.
///
/// # Example
///
/// ```json
/// // Client sends
/// {"event": "select_scene_role", "data": {"scene": "restaurant", "user_role": "customer", "ai_role": "waiter"}}
///
/// // Server responds
/// {"event": "scene_role_confirmed", "data": {"scene": "restaurant", "user_role": "customer", "ai_role": "waiter", "status": "ready"}}
/// ```
pub fn create_session_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ws/socket.io", get(session_handler))
        .layer(TraceLayer::new_for_http())
}
