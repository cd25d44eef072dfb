//! Core trait and request type for fetchers

use std::fmt;
use std::sync::Arc;

use crate::error::SettingsResult;

/// The decomposed settings URI handed to a fetcher
///
/// For `json+gsm://acct@host/projects/1/secrets/s/versions/2` the credential
/// is `acct`, the host is `host` and the path is
/// `/projects/1/secrets/s/versions/2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchRequest {
    /// User-info principal, percent-decoded (empty when absent)
    pub credential: String,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// URI path including its leading `/`
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl FetchRequest {
    /// Create a request from a credential and a path
    pub fn new(credential: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }
}

/// Trait for fetchers that retrieve raw settings text from a source
///
/// A fetch is a single blocking call. Fetchers keep no state between calls
/// and neither retry nor cache; errors from the underlying client are
/// wrapped with `SettingsError::fetch` and otherwise passed through.
pub trait Fetcher: Send + Sync {
    /// Name the fetcher is registered under (the URI scheme suffix)
    fn name(&self) -> &str;

    /// Retrieve the payload described by `request`
    fn fetch(&self, request: &FetchRequest) -> SettingsResult<String>;
}

/// A fetcher backed by a closure
///
/// Handy for tests and for sources that need no configuration.
///
/// # Example
///
/// ```
/// use secret_settings_core::fetchers::{FnFetcher, Fetcher, FetchRequest};
///
/// let fetcher = FnFetcher::new("static", |_req: &FetchRequest| Ok(r#"{"key": 1}"#.to_string()));
/// assert_eq!(fetcher.fetch(&FetchRequest::default()).unwrap(), r#"{"key": 1}"#);
/// ```
pub struct FnFetcher<F> {
    name: String,
    func: F,
}

impl<F> FnFetcher<F>
where
    F: Fn(&FetchRequest) -> SettingsResult<String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }

    /// Wrap into a shared trait object
    pub fn shared(name: impl Into<String>, func: F) -> Arc<dyn Fetcher>
    where
        F: 'static,
    {
        Arc::new(Self::new(name, func))
    }
}

impl<F> fmt::Debug for FnFetcher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFetcher").field("name", &self.name).finish()
    }
}

impl<F> Fetcher for FnFetcher<F>
where
    F: Fn(&FetchRequest) -> SettingsResult<String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, request: &FetchRequest) -> SettingsResult<String> {
        (self.func)(request)
    }
}
