//! Configuration module for the Lingo Gateway server
//!
//! Configuration is assembled from several sources. Priority, highest to
//! lowest: CLI flags (applied in `main`) > YAML file > environment variables
//! (actual ENV vars override `.env` values) > defaults. The `.env` file is
//! loaded in main.rs at application startup.
//!
//! # Example
//! ```rust,no_run
//! use lingo_gateway::config::ServerConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use thiserror::Error;

mod yaml;

pub use yaml::YamlConfig;

/// Default port when running in development mode
pub const DEFAULT_DEV_PORT: u16 = 5000;

/// Default port when running in production mode (TLS)
pub const DEFAULT_PRODUCTION_PORT: u16 = 443;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_SECRET_KEY: &str = "dev-secret-key-change-in-production";
const DEFAULT_PRODUCTION_CERT_DIR: &str = "/etc/letsencrypt/live/yourdomain.com";

/// Runtime environment, gated by the `APP_ENV` environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Detect the environment from `APP_ENV` (`"production"` selects
    /// production, anything else development).
    pub fn detect() -> Self {
        match std::env::var("APP_ENV") {
            Ok(value) if value == "production" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// TLS configuration for HTTPS and WSS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid PORT value {value:?}: must be an integer port number")]
    InvalidPort { value: String },
}

/// Server configuration
///
/// Contains everything needed to run the gateway: bind address, runtime
/// environment, session secret, and certificate locations for both the
/// development bootstrap and production deployments.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Runtime environment (selects default port and certificate source)
    pub environment: Environment,

    /// Session signing secret (`SECRET_KEY`). The current handlers keep no
    /// session state; the value is loaded for the front-end session layer.
    pub secret_key: String,

    /// Skip TLS entirely in development (`--no-ssl`)
    pub no_tls: bool,

    /// Directory where development certificates are generated and reused
    pub cert_dir: PathBuf,

    /// Directory holding production certificates (`SSL_CERT_PATH`),
    /// expected to contain `fullchain.pem` and `privkey.pem`
    pub production_cert_dir: PathBuf,

    /// CORS allowed origins (comma-separated list or "*" for all)
    pub cors_allowed_origins: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// Port priority: `PORT` env var, then the environment's default
    /// (5000 in development, 443 in production). CLI overrides are applied
    /// by the caller on top of the returned value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::detect();

        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            Err(_) => default_port(environment),
        };

        Ok(ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port,
            environment,
            secret_key: std::env::var("SECRET_KEY")
                .unwrap_or_else(|_| DEFAULT_SECRET_KEY.to_string()),
            no_tls: false,
            cert_dir: default_cert_dir(),
            production_cert_dir: std::env::var("SSL_CERT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_PRODUCTION_CERT_DIR)),
            cors_allowed_origins: Some(
                std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
        })
    }

    /// Load configuration from a YAML file with environment variable base.
    ///
    /// Environment variables (and their defaults) provide the base
    /// configuration; values present in the YAML file override them.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let mut config = Self::from_env()?;
        let yaml = YamlConfig::from_file(path)?;
        config.apply_yaml(yaml);
        Ok(config)
    }

    fn apply_yaml(&mut self, yaml: YamlConfig) {
        if let Some(server) = yaml.server {
            if let Some(host) = server.host {
                self.host = host;
            }
            if let Some(port) = server.port {
                self.port = port;
            }
            if let Some(secret_key) = server.secret_key {
                self.secret_key = secret_key;
            }
            if let Some(cert_dir) = server.cert_dir {
                self.cert_dir = cert_dir;
            }
        }
        if let Some(security) = yaml.security {
            if let Some(origins) = security.cors_allowed_origins {
                self.cors_allowed_origins = Some(origins);
            }
        }
    }

    /// Get the server address as a string in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

fn default_port(environment: Environment) -> u16 {
    if environment.is_production() {
        DEFAULT_PRODUCTION_PORT
    } else {
        DEFAULT_DEV_PORT
    }
}

/// Development certificates live in a `certs` directory next to the running
/// executable, falling back to the working directory when the executable path
/// cannot be resolved.
fn default_cert_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("certs")))
        .unwrap_or_else(|| PathBuf::from("certs"))
}
