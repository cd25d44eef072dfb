//! Parsing of settings URIs (`store[+fetcher]://user@host/path`)

use url::Url;

use crate::error::{SettingsError, SettingsResult};
use crate::fetchers::FetchRequest;

/// A parsed settings URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsUri {
    raw: String,
    store_type: String,
    fetcher_type: Option<String>,
    request: FetchRequest,
}

impl SettingsUri {
    /// Parse `config`, splitting the scheme into store and fetcher types
    ///
    /// At most one `+fetcher` segment is accepted and neither segment may be
    /// empty. Schemes are case-insensitive and normalized to lowercase.
    pub fn parse(config: &str) -> SettingsResult<Self> {
        let url = Url::parse(config).map_err(|e| SettingsError::invalid_uri(config, e.to_string()))?;

        let mut segments = url.scheme().split('+');
        let store_type = segments.next().unwrap_or_default().to_string();
        let fetcher_type = segments.next().map(str::to_string);
        if segments.next().is_some() {
            return Err(SettingsError::invalid_uri(
                config,
                "only one fetcher may follow the store type",
            ));
        }
        if store_type.is_empty() || fetcher_type.as_deref() == Some("") {
            return Err(SettingsError::invalid_uri(config, "empty store or fetcher type"));
        }

        let decode = |text: &str| {
            urlencoding::decode(text)
                .map(|decoded| decoded.into_owned())
                .map_err(|e| SettingsError::invalid_uri(config, e.to_string()))
        };

        let request = FetchRequest {
            credential: decode(url.username())?,
            password: url.password().map(decode).transpose()?,
            host: url.host_str().filter(|h| !h.is_empty()).map(str::to_string),
            port: url.port(),
            path: url.path().to_string(),
            query: url.query().map(str::to_string),
            fragment: url.fragment().map(str::to_string),
        };

        Ok(Self {
            raw: config.to_string(),
            store_type,
            fetcher_type,
            request,
        })
    }

    /// The URI exactly as given
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn store_type(&self) -> &str {
        &self.store_type
    }

    pub fn fetcher_type(&self) -> Option<&str> {
        self.fetcher_type.as_deref()
    }

    /// The decomposed parts handed to a fetcher
    pub fn request(&self) -> &FetchRequest {
        &self.request
    }
}

impl std::str::FromStr for SettingsUri {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
