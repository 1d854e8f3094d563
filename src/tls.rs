//! TLS certificate acquisition
//!
//! Two concerns live here: the development certificate bootstrap, which
//! guarantees a self-signed key/certificate pair exists on disk before the
//! server starts listening with TLS, and the environment-dependent selection
//! of the certificate source at startup.
//!
//! The bootstrap shells out to the `openssl` tool once per environment;
//! subsequent startups find the files already present and skip generation.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;
use tokio::time::{Duration, timeout};
use tracing::{error, info};

use crate::config::{ServerConfig, TlsConfig};

/// Development private key file name inside the certificate directory
pub const DEV_KEY_FILE: &str = "key.pem";

/// Development certificate file name inside the certificate directory
pub const DEV_CERT_FILE: &str = "cert.pem";

const PRODUCTION_CERT_FILE: &str = "fullchain.pem";
const PRODUCTION_KEY_FILE: &str = "privkey.pem";

/// External certificate generation tool
const GENERATOR_TOOL: &str = "openssl";

/// Subject for generated development certificates
const CERT_SUBJECT: &str = "/C=US/ST=State/L=City/O=Organization/CN=localhost";

/// Upper bound on the one-shot generation call. Key generation normally
/// completes in well under a second; the bound keeps a wedged tool from
/// hanging startup.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// A key and certificate that exist together on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificatePair {
    pub key_path: PathBuf,
    pub cert_path: PathBuf,
}

/// Certificate acquisition errors
#[derive(Debug, Error)]
pub enum CertError {
    #[error("failed to create certificate directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "production certificates not found under {} (expected fullchain.pem and privkey.pem)",
        dir.display()
    )]
    MissingProductionCertificates { dir: PathBuf },
}

/// Ensure a development key/certificate pair exists in `dir`.
///
/// Idempotent: when both files already exist their paths are returned
/// unchanged and no tool is invoked. Otherwise `dir` is created if absent and
/// a 4096-bit key with a 365-day self-signed certificate is generated.
///
/// A failed or unresponsive generation tool is not fatal: the failure is
/// logged and `Ok(None)` is returned so the caller can fall back to plain
/// HTTP.
pub async fn ensure_dev_certificate(dir: &Path) -> Result<Option<CertificatePair>, CertError> {
    ensure_dev_certificate_with_tool(dir, GENERATOR_TOOL).await
}

async fn ensure_dev_certificate_with_tool(
    dir: &Path,
    tool: &str,
) -> Result<Option<CertificatePair>, CertError> {
    let key_path = dir.join(DEV_KEY_FILE);
    let cert_path = dir.join(DEV_CERT_FILE);

    // Both files together or neither; a lone survivor is regenerated.
    if key_path.exists() && cert_path.exists() {
        return Ok(Some(CertificatePair {
            key_path,
            cert_path,
        }));
    }

    std::fs::create_dir_all(dir).map_err(|source| CertError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    info!(
        dir = %dir.display(),
        "Generating self-signed certificate for development"
    );

    let generation = Command::new(tool)
        .args(["req", "-x509", "-newkey", "rsa:4096"])
        .arg("-keyout")
        .arg(&key_path)
        .arg("-out")
        .arg(&cert_path)
        .args(["-days", "365", "-nodes", "-subj", CERT_SUBJECT])
        .output();

    match timeout(GENERATION_TIMEOUT, generation).await {
        Ok(Ok(output)) if output.status.success() => {
            info!("Self-signed certificate generated successfully");
            Ok(Some(CertificatePair {
                key_path,
                cert_path,
            }))
        }
        Ok(Ok(output)) => {
            error!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "Certificate generation failed"
            );
            Ok(None)
        }
        Ok(Err(e)) => {
            error!("Failed to run {tool}: {e}");
            Ok(None)
        }
        Err(_) => {
            error!(
                "Certificate generation timed out after {}s",
                GENERATION_TIMEOUT.as_secs()
            );
            Ok(None)
        }
    }
}

/// Decide where TLS certificates come from for this startup.
///
/// Production expects an existing pair under the configured certificate
/// directory and refuses to start without it. Development bootstraps a
/// self-signed pair, falling back to plain HTTP when generation fails or
/// `no_tls` is set.
pub async fn select_certificate_source(
    config: &ServerConfig,
) -> Result<Option<TlsConfig>, CertError> {
    if config.is_production() {
        let cert_path = config.production_cert_dir.join(PRODUCTION_CERT_FILE);
        let key_path = config.production_cert_dir.join(PRODUCTION_KEY_FILE);

        if cert_path.exists() && key_path.exists() {
            return Ok(Some(TlsConfig {
                cert_path,
                key_path,
            }));
        }
        return Err(CertError::MissingProductionCertificates {
            dir: config.production_cert_dir.clone(),
        });
    }

    if config.no_tls {
        return Ok(None);
    }

    Ok(ensure_dev_certificate(&config.cert_dir)
        .await?
        .map(|pair| TlsConfig {
            cert_path: pair.cert_path,
            key_path: pair.key_path,
        }))
}
