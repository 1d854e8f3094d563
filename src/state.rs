//! Shared application state
//!
//! `AppState` is constructed once in main and shared as `Arc<AppState>`
//! through axum. Everything in it is either read-only after startup (config,
//! scene catalog) or internally synchronized (the connection table).

use std::sync::Arc;

use dashmap::DashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::scenes::SceneCatalog;

/// One client's live bidirectional channel.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Opaque connection identifier
    pub id: String,
    /// When the upgrade handshake was accepted
    pub connected_at: OffsetDateTime,
}

impl Connection {
    pub fn open() -> Self {
        Connection {
            id: Uuid::new_v4().to_string(),
            connected_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Application state shared across all handlers
pub struct AppState {
    pub config: ServerConfig,
    pub catalog: SceneCatalog,
    connections: DashMap<String, Connection>,
}

impl AppState {
    pub fn new(config: ServerConfig, catalog: SceneCatalog) -> Arc<Self> {
        Arc::new(AppState {
            config,
            catalog,
            connections: DashMap::new(),
        })
    }

    pub fn register_connection(&self, connection: Connection) {
        self.connections.insert(connection.id.clone(), connection);
    }

    pub fn remove_connection(&self, id: &str) -> Option<Connection> {
        self.connections.remove(id).map(|(_, connection)| connection)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
