//! Secret Settings Core
//!
//! Typed settings read from interchangeable sources, chosen by a single
//! configuration URI such as
//! `json+gsm://service_account@googleserviceaccount.com/projects/012345678/secrets/my-secret/versions/42`.
//!
//! - The URI scheme names a store (`json`) and optionally a fetcher (`gsm`)
//! - The fetcher retrieves raw text; the store decodes it
//! - Every store answers `get_value`, `get_bool`, `get_mapping`, `get_array`
//!
//! Resolution is synchronous and happens once, at startup.
//!
//! ```rust,no_run
//! use secret_settings_core::{load, Coercion, SettingsStore};
//!
//! // Reads DJ_SECRET_SETTINGS_URL; plain environment variables when unset
//! let settings = load(None)?;
//!
//! let debug = settings.get_bool("DEBUG", false)?;
//! let port = settings.get_value("PORT", Some("8000".into()), Some(&Coercion::Int))?;
//! let databases = settings.get_mapping("DATABASES", None)?;
//! # Ok::<(), secret_settings_core::SettingsError>(())
//! ```
//!
//! ## Custom sources
//!
//! Stores and fetchers are looked up by name, caller registrations first:
//!
//! ```rust,ignore
//! use secret_settings_core::registry::register_fetcher;
//!
//! register_fetcher("vault", "HashiCorp Vault", |ctx| Ok(Arc::new(VaultFetcher::new(ctx.config)?)));
//! let settings = secret_settings_core::load(Some("json+vault://role@vault.internal/kv/app"))?;
//! ```

pub mod error;
pub mod stores;
pub mod fetchers;
pub mod registry;
pub mod resolver;
pub mod config;
pub mod logging;

pub use error::{Capability, SettingsError, SettingsResult};

pub use stores::{
    SettingsStore, SettingsStoreExt, Coercion,
    EnvironmentStore, JsonStore,
    Environment, ProcessEnvironment, MemoryEnvironment, SharedEnvironment,
};

pub use fetchers::{Fetcher, FetchRequest, FnFetcher, FileFetcher};
#[cfg(feature = "gsm")]
pub use fetchers::{GsmFetcher, SecretManagerClient};

pub use registry::{
    Registry, StoreContext, FetcherContext,
    register_store, register_fetcher, list_stores, list_fetchers,
};

pub use resolver::{Resolver, SettingsUri, load};

pub use config::{ResolverConfig, GsmConfig};

pub use logging::{Logger, NoOpLogger, ConsoleLogger};
