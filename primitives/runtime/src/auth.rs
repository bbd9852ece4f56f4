//! Per-call credentials.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tonic::metadata::{Ascii, MetadataValue};
use tonic::service::Interceptor;
use tonic::{Request, Status};

use crate::{Result, RunError};

/// Metadata key carrying the credential.
pub const AUTHORIZATION: &str = "authorization";

/// Validity of a self-signed JWT.
pub const JWT_LIFETIME: Duration = Duration::from_secs(3600);

/// Credential flags.
///
/// At most one credential is sent. A JWT signed with the key in
/// `jwt_key_file` wins over one signed with `jwt_key`, which wins over
/// `auth_token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOptions {
    /// Opaque token
    pub auth_token: Option<String>,
    /// Scheme placed before `auth_token`
    pub auth_token_type: String,
    /// Service-account JSON key used to sign a JWT
    pub jwt_key: Option<String>,
    /// File holding a service-account JSON key
    pub jwt_key_file: Option<PathBuf>,
    /// `aud` claim of a signed JWT, see [`service_audience`]
    pub audience: String,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            auth_token: None,
            auth_token_type: "Bearer".to_string(),
            jwt_key: None,
            jwt_key_file: None,
            audience: String::new(),
        }
    }
}

impl AuthOptions {
    /// Whether any credential was given.
    pub fn has_credentials(&self) -> bool {
        self.auth_token.is_some() || self.jwt_key.is_some() || self.jwt_key_file.is_some()
    }

    /// The `authorization` header value, if any credential was given.
    pub fn header_value(&self) -> Result<Option<String>> {
        if let Some(path) = &self.jwt_key_file {
            let key = std::fs::read_to_string(path).map_err(|e| {
                RunError::Config(format!("failed to read JWT key file {}: {e}", path.display()))
            })?;
            return Ok(Some(format!("Bearer {}", sign_jwt(&key, &self.audience)?)));
        }
        if let Some(key) = &self.jwt_key {
            return Ok(Some(format!("Bearer {}", sign_jwt(key, &self.audience)?)));
        }
        Ok(self.auth_token.as_ref().map(|token| format!("{} {token}", self.auth_token_type)))
    }

    /// Build the interceptor for these credentials.
    ///
    /// Credentials are refused on a plaintext connection.
    pub fn interceptor(&self, tls: bool) -> Result<AuthInterceptor> {
        if self.has_credentials() && !tls {
            return Err(RunError::Config(
                "credentials require transport security, pass --tls".to_string(),
            ));
        }
        let value = match self.header_value()? {
            Some(header) => Some(
                MetadataValue::try_from(header.as_str())
                    .map_err(|e| RunError::Config(format!("invalid authorization value: {e}")))?,
            ),
            None => None,
        };
        Ok(AuthInterceptor { value })
    }
}

/// Audience a service expects in a self-signed JWT: `https://<host>/<service>`.
///
/// The default TLS port is dropped from the host.
pub fn service_audience(server_addr: &str, service: &str) -> String {
    let host = server_addr
        .strip_prefix("https://")
        .or_else(|| server_addr.strip_prefix("http://"))
        .unwrap_or(server_addr);
    let host = host.strip_suffix(":443").unwrap_or(host);
    format!("https://{host}/{service}")
}

#[derive(Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key_id: String,
    private_key: String,
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

/// Sign an RS256 JWT for `audience` with a service-account JSON key.
fn sign_jwt(key_json: &str, audience: &str) -> Result<String> {
    let key: ServiceAccountKey = serde_json::from_str(key_json)
        .map_err(|e| RunError::Config(format!("invalid JWT key: {e}")))?;
    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| RunError::Config(format!("invalid JWT private key: {e}")))?;

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(key.private_key_id.clone());
    let iat = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default();
    let claims = Claims {
        iss: &key.client_email,
        sub: &key.client_email,
        aud: audience,
        iat,
        exp: iat + JWT_LIFETIME.as_secs(),
    };
    jsonwebtoken::encode(&header, &claims, &signing_key)
        .map_err(|e| RunError::Config(format!("failed to sign JWT: {e}")))
}

/// Attaches the `authorization` header to every outgoing call.
#[derive(Debug, Clone, Default)]
pub struct AuthInterceptor {
    value: Option<MetadataValue<Ascii>>,
}

impl Interceptor for AuthInterceptor {
    fn call(&mut self, mut request: Request<()>) -> std::result::Result<Request<()>, Status> {
        if let Some(value) = &self.value {
            request.metadata_mut().insert(AUTHORIZATION, value.clone());
        }
        Ok(request)
    }
}
