//! Resolver configuration
//!
//! - `ResolverConfig`: which environment variable holds the settings URI,
//!   plus options for the bundled `gsm` fetcher
//! - YAML file support (user level or explicit path)

mod traits;
mod file;

pub use traits::{ConfigError, ConfigResult};
pub use file::{
    ResolverConfig, GsmConfig,
    DEFAULT_URL_ENV_VAR, DEFAULT_GSM_ENDPOINT, DEFAULT_METADATA_URL, DEFAULT_TOKEN_ENV_VAR,
};
