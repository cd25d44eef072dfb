//! Google Secret Manager fetcher (`json+gsm://account@host/projects/.../versions/N`)
//!
//! The URI path, minus its leading `/`, is the secret version resource name.
//! The payload is returned as text; the store decides how to decode it.

use std::sync::Arc;
use std::time::Duration;

use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde::Deserialize;
use thiserror::Error;

use super::traits::{FetchRequest, Fetcher};
use crate::config::GsmConfig;
use crate::error::{SettingsError, SettingsResult};
use crate::stores::SharedEnvironment;

/// Errors surfaced by the Secret Manager client
#[derive(Error, Debug)]
pub enum GsmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Secret Manager returned {status} for {name}: {message}")]
    Status {
        name: String,
        status: u16,
        message: String,
    },

    #[error("Cannot obtain access token: {0}")]
    Token(String),

    #[error("Secret version {0} has no payload")]
    MissingPayload(String),

    #[error("Payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Minimal Secret Manager client contract
pub trait SecretManagerClient: Send + Sync {
    /// Read the payload of secret version `name` as `credential`
    fn access_secret_version(&self, credential: &str, name: &str) -> Result<String, GsmError>;
}

/// Fetcher that reads one secret version from Google Secret Manager
pub struct GsmFetcher {
    client: Arc<dyn SecretManagerClient>,
}

impl std::fmt::Debug for GsmFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GsmFetcher").finish_non_exhaustive()
    }
}

impl GsmFetcher {
    /// Create a fetcher around any client implementation
    pub fn new(client: Arc<dyn SecretManagerClient>) -> Self {
        Self { client }
    }

    /// Create a fetcher backed by the REST client
    pub fn from_config(config: &GsmConfig, environment: SharedEnvironment) -> SettingsResult<Self> {
        let client = HttpSecretManagerClient::new(config.clone(), environment)
            .map_err(|e| SettingsError::fetch("gsm", e))?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Resource name for a URI path: a single leading `/` is removed
    pub fn secret_name(path: &str) -> &str {
        path.strip_prefix('/').unwrap_or(path)
    }
}

impl Fetcher for GsmFetcher {
    fn name(&self) -> &str {
        "gsm"
    }

    fn fetch(&self, request: &FetchRequest) -> SettingsResult<String> {
        let name = Self::secret_name(&request.path);
        crate::debug_log!("accessing secret version {} as [{}]", name, request.credential);
        self.client
            .access_secret_version(&request.credential, name)
            .map_err(|e| SettingsError::fetch(self.name(), e))
    }
}

#[derive(Deserialize)]
struct AccessSecretVersionResponse {
    payload: Option<SecretPayload>,
}

#[derive(Deserialize)]
struct SecretPayload {
    data: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Secret Manager REST client using a blocking HTTP client
///
/// The bearer token comes from the configured token variable when set,
/// otherwise from the metadata server for the requested service account
/// (`default` when the URI carries none).
///
/// Must not be constructed or used from inside an async runtime.
pub struct HttpSecretManagerClient {
    http: reqwest::blocking::Client,
    config: GsmConfig,
    environment: SharedEnvironment,
}

impl HttpSecretManagerClient {
    pub fn new(config: GsmConfig, environment: SharedEnvironment) -> Result<Self, GsmError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()?;
        Ok(Self {
            http,
            config,
            environment,
        })
    }

    fn access_token(&self, credential: &str) -> Result<String, GsmError> {
        if let Some(token) = self
            .environment
            .var(&self.config.token_env_var)
            .filter(|token| !token.is_empty())
        {
            return Ok(token);
        }

        let account = if credential.is_empty() { "default" } else { credential };
        let url = format!(
            "{}/{}/token",
            self.config.metadata_url.trim_end_matches('/'),
            account
        );
        crate::debug_log!("requesting access token for [{}] from metadata server", account);

        let response = self
            .http
            .get(&url)
            .header("Metadata-Flavor", "Google")
            .send()
            .map_err(|e| GsmError::Token(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(GsmError::Token(format!(
                "metadata server returned {} for [{}]",
                status.as_u16(),
                account
            )));
        }
        let token: TokenResponse = response.json()?;
        Ok(token.access_token)
    }
}

impl SecretManagerClient for HttpSecretManagerClient {
    fn access_secret_version(&self, credential: &str, name: &str) -> Result<String, GsmError> {
        let token = self.access_token(credential)?;
        let url = format!("{}/{}:access", self.config.endpoint.trim_end_matches('/'), name);

        let response = self.http.get(&url).bearer_auth(token).send()?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(GsmError::Status {
                name: name.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body: AccessSecretVersionResponse = response.json()?;
        let data = body
            .payload
            .and_then(|payload| payload.data)
            .ok_or_else(|| GsmError::MissingPayload(name.to_string()))?;
        let bytes = BASE64_STANDARD.decode(data)?;
        Ok(String::from_utf8(bytes)?)
    }
}
