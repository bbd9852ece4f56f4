//! Channel construction from the connection flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint, Identity};

use crate::{Result, RunError};

/// Default dial timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How to reach the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// `host:port` of the server
    pub server_addr: String,
    /// Dial timeout
    pub timeout: Duration,
    /// Use TLS
    pub tls: bool,
    /// Name to verify the server certificate against, defaults to the host
    pub server_name: Option<String>,
    /// Skip server certificate verification
    pub insecure_skip_verify: bool,
    /// PEM file with the CA to trust in addition to the system roots
    pub ca_cert_file: Option<PathBuf>,
    /// PEM client certificate
    pub cert_file: Option<PathBuf>,
    /// PEM client key
    pub key_file: Option<PathBuf>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            server_addr: "localhost:8080".to_string(),
            timeout: DEFAULT_TIMEOUT,
            tls: false,
            server_name: None,
            insecure_skip_verify: false,
            ca_cert_file: None,
            cert_file: None,
            key_file: None,
        }
    }
}

impl ConnectOptions {
    /// Options for a plaintext connection to `server_addr`.
    pub fn new(server_addr: impl Into<String>) -> Self {
        Self { server_addr: server_addr.into(), ..Self::default() }
    }

    /// The URI dialed for these options.
    pub fn uri(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{scheme}://{}", self.server_addr)
    }

    /// Build the tonic endpoint, including TLS settings when enabled.
    pub fn endpoint(&self) -> Result<Endpoint> {
        let endpoint = Endpoint::from_shared(self.uri())?.connect_timeout(self.timeout);
        match self.tls_config()? {
            Some(tls) => Ok(endpoint.tls_config(tls)?),
            None => Ok(endpoint),
        }
    }

    /// TLS settings, or `None` for a plaintext connection.
    ///
    /// Certificate files are only consulted when TLS is enabled.
    pub fn tls_config(&self) -> Result<Option<ClientTlsConfig>> {
        if !self.tls {
            return Ok(None);
        }
        if self.insecure_skip_verify {
            return Err(RunError::Config(
                "insecure-skip-verify is not supported, pass --ca-cert-file instead".to_string(),
            ));
        }

        let mut config = ClientTlsConfig::new().with_native_roots().domain_name(self.domain_name());
        if let Some(path) = &self.ca_cert_file {
            config = config.ca_certificate(Certificate::from_pem(read_pem(path)?));
        }
        match (&self.cert_file, &self.key_file) {
            (Some(cert), Some(key)) => {
                config = config.identity(Identity::from_pem(read_pem(cert)?, read_pem(key)?));
            }
            (Some(_), None) => {
                return Err(RunError::Config("--cert-file requires --key-file".to_string()))
            }
            (None, Some(_)) => {
                return Err(RunError::Config("--key-file requires --cert-file".to_string()))
            }
            (None, None) => {}
        }
        Ok(Some(config))
    }

    /// Name the server certificate is verified against.
    pub fn domain_name(&self) -> String {
        if let Some(name) = self.server_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        host_of(&self.server_addr).to_string()
    }

    /// Dial the server.
    pub async fn connect(&self) -> Result<Channel> {
        let endpoint = self.endpoint()?;
        tracing::debug!(uri = %self.uri(), "dialing");
        Ok(endpoint.connect().await?)
    }
}

fn host_of(addr: &str) -> &str {
    if let Some(rest) = addr.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match addr.rsplit_once(':') {
        Some((host, _port)) => host,
        None => addr,
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| RunError::Config(format!("failed to read {}: {e}", path.display())))
}
