//! Resolution of a configuration URI into a settings store
//!
//! `load` reads the URI (argument or `DJ_SECRET_SETTINGS_URL`), resolves the
//! optional fetcher and the store through the registry, and returns the
//! store behind the `SettingsStore` trait.

mod uri;
mod settings_resolver;

pub use uri::SettingsUri;
pub use settings_resolver::{Resolver, load, ENVIRONMENT_SCHEME};
