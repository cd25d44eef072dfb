//! Local file fetcher (`json+file:///etc/app/settings.json`)

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use super::traits::{FetchRequest, Fetcher};
use crate::error::{SettingsError, SettingsResult};

#[derive(Error, Debug)]
pub enum FileFetchError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path is not valid UTF-8 after decoding: {0}")]
    Encoding(String),
}

/// Fetcher that reads a file from the local filesystem
///
/// `json+file:///abs/settings.json` reads `/abs/settings.json`. When the URI
/// has an authority it is taken as the first relative path segment, so
/// `json+file://config/settings.json` reads `config/settings.json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFetcher;

impl FileFetcher {
    pub fn new() -> Self {
        Self
    }

    /// Filesystem path addressed by `request`
    pub fn file_path(request: &FetchRequest) -> Result<PathBuf, FileFetchError> {
        let decoded = urlencoding::decode(&request.path)
            .map_err(|_| FileFetchError::Encoding(request.path.clone()))?;
        let path = match request.host.as_deref() {
            Some(host) if !host.is_empty() => format!("{host}{decoded}"),
            _ => decoded.into_owned(),
        };
        Ok(PathBuf::from(path))
    }
}

impl Fetcher for FileFetcher {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch(&self, request: &FetchRequest) -> SettingsResult<String> {
        let path = Self::file_path(request).map_err(|e| SettingsError::fetch(self.name(), e))?;
        crate::debug_log!("reading settings file {}", path.display());
        fs::read_to_string(&path)
            .map_err(|source| SettingsError::fetch(self.name(), FileFetchError::Read { path, source }))
    }
}
