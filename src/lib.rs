pub mod config;
pub mod handlers;
pub mod routes;
pub mod scenes;
pub mod state;
pub mod tls;

// Re-export commonly used items for convenience
pub use config::{Environment, ServerConfig, TlsConfig};
pub use scenes::SceneCatalog;
pub use state::AppState;
pub use tls::{CertificatePair, ensure_dev_certificate, select_certificate_source};
