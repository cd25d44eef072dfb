//! Error types shared by stores, fetchers and the resolver

use std::fmt;

use thiserror::Error;

/// Kind of pluggable component that could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Store,
    Fetcher,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Store => "store",
            Capability::Fetcher => "fetcher",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while resolving or reading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    /// No store or fetcher is registered under the requested name
    #[error("{capability} [{name}] is not installed: {hint}")]
    NotInstalled {
        capability: Capability,
        name: String,
        hint: String,
    },

    /// Decoded data does not satisfy the structural precondition of a store
    #[error("Bad data: {0}")]
    BadData(String),

    /// `get_value` was asked to coerce to a boolean
    #[error("Do not coerce to bool, use get_bool() instead")]
    DoNotCoerceBool,

    /// A coercion function rejected the value
    #[error("Cannot coerce value to {target}: {message}")]
    Coercion { target: String, message: String },

    /// A stored or default value has the wrong structural type
    #[error("Resulting value (from key: [{key}]) must be a {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// Text that should hold JSON failed to parse
    #[error("Malformed JSON in {context}: {source}")]
    MalformedData {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration value is not a usable settings URI
    #[error("Invalid settings URI [{uri}]: {reason}")]
    InvalidUri { uri: String, reason: String },

    /// Error surfaced by a fetcher, passed through untranslated
    #[error("Fetcher [{fetcher}] failed: {source}")]
    Fetch {
        fetcher: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SettingsError {
    /// Create a not-installed error with the default installation hint
    pub fn not_installed(capability: Capability, name: impl Into<String>) -> Self {
        let name = name.into();
        let hint = format!(
            "if [{name}] is correct, register a {capability} named [{name}] or add the secret-settings-{name} package"
        );
        Self::NotInstalled {
            capability,
            name,
            hint,
        }
    }

    /// Create a type mismatch error for a key
    pub fn type_mismatch(key: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
        }
    }

    /// Create a coercion error
    pub fn coercion(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Coercion {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create an invalid URI error
    pub fn invalid_uri(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUri {
            uri: uri.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an error raised by a fetcher
    pub fn fetch<E>(fetcher: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Fetch {
            fetcher: fetcher.into(),
            source: source.into(),
        }
    }
}

pub type SettingsResult<T> = Result<T, SettingsError>;
