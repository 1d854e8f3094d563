//! WebSocket session gateway
//!
//! One bidirectional channel per client, mounted at `/ws/socket.io`. Every
//! recognized inbound event is acknowledged with exactly one outbound event
//! on the same connection; there is no cross-connection traffic.

mod handler;
pub mod messages;

pub use handler::session_handler;
