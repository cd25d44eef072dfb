//! Resolution of a settings URI into a store

use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::error::SettingsResult;
use crate::logging::{NoOpLogger, SharedLogger};
use crate::registry::{self, FetcherContext, FetcherFactory, Registry, StoreContext, StoreFactory};
use crate::stores::{EnvironmentStore, ProcessEnvironment, SettingsStore, SharedEnvironment};
use crate::{log_debug, log_info};

use super::uri::SettingsUri;

/// Prefix that selects the environment store without any lookup
pub const ENVIRONMENT_SCHEME: &str = "environment:";

/// Builds a settings store from a configuration URI
///
/// Resolution order:
/// 1. The URI passed to `load`, else the configured environment variable
///    (`DJ_SECRET_SETTINGS_URL` by default)
/// 2. No URI, or one starting with `environment:` → `EnvironmentStore`
/// 3. Otherwise parse `store[+fetcher]://...`, run the fetcher if any, and
///    hand its output to the store factory
///
/// Factories come from the global registry unless the resolver was given
/// its own with `with_registry`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use secret_settings_core::resolver::Resolver;
/// use secret_settings_core::stores::MemoryEnvironment;
///
/// let env = Arc::new(MemoryEnvironment::with_vars([("DEBUG", "on")]));
/// let store = Resolver::new().with_environment(env).load(None).unwrap();
///
/// assert_eq!(store.name(), "environment");
/// assert!(store.get_bool("DEBUG", false).unwrap());
/// ```
pub struct Resolver {
    config: ResolverConfig,
    environment: SharedEnvironment,
    registry: Option<Registry>,
    logger: SharedLogger,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("environment", &self.environment)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Create a resolver over the process environment and the global registry
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::default(),
            environment: Arc::new(ProcessEnvironment),
            registry: None,
            logger: Arc::new(NoOpLogger),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Read the URI variable (and environment store values) from `environment`
    pub fn with_environment(mut self, environment: SharedEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Use a private registry instead of the global one
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `config` (or the configured environment variable) into a store
    pub fn load(&self, config: Option<&str>) -> SettingsResult<Box<dyn SettingsStore>> {
        let uri = match self.configured_uri(config) {
            Some(uri) if !is_environment_uri(&uri) => uri,
            _ => {
                log_debug!(self.logger, "using environment store");
                return Ok(Box::new(EnvironmentStore::with_environment(
                    self.environment.clone(),
                )));
            }
        };

        let parsed = SettingsUri::parse(&uri)?;

        let data = match parsed.fetcher_type() {
            Some(fetcher_type) => {
                let factory = self.fetcher_factory(fetcher_type)?;
                let fetcher = factory(FetcherContext {
                    config: &self.config,
                    environment: &self.environment,
                })?;
                log_debug!(self.logger, "fetching settings with [{}]", fetcher.name());
                Some(fetcher.fetch(parsed.request())?)
            }
            None => None,
        };

        let factory = self.store_factory(parsed.store_type())?;
        let store = factory(StoreContext {
            data,
            config: uri.clone(),
            environment: self.environment.clone(),
        })?;

        log_info!(
            self.logger,
            "loaded [{}] store (fetcher: {})",
            store.name(),
            parsed.fetcher_type().unwrap_or("none")
        );
        Ok(store)
    }

    fn configured_uri(&self, config: Option<&str>) -> Option<String> {
        match config {
            Some(config) if !config.is_empty() => Some(config.to_string()),
            _ => self
                .environment
                .var(&self.config.url_env_var)
                .filter(|uri| !uri.is_empty()),
        }
    }

    fn store_factory(&self, name: &str) -> SettingsResult<StoreFactory> {
        match &self.registry {
            Some(registry) => registry.store_factory(name),
            None => registry::global_store_factory(name),
        }
    }

    fn fetcher_factory(&self, name: &str) -> SettingsResult<FetcherFactory> {
        match &self.registry {
            Some(registry) => registry.fetcher_factory(name),
            None => registry::global_fetcher_factory(name),
        }
    }
}

fn is_environment_uri(uri: &str) -> bool {
    uri.get(..ENVIRONMENT_SCHEME.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(ENVIRONMENT_SCHEME))
}

/// Resolve a store with the default resolver
///
/// `config` is a settings URI such as
/// `json+gsm://service_account@googleserviceaccount.com/projects/012345678/secrets/my-secret/versions/42`.
/// With `None`, the URI is read from `DJ_SECRET_SETTINGS_URL`; when that is
/// unset too, the process environment is used directly.
pub fn load(config: Option<&str>) -> SettingsResult<Box<dyn SettingsStore>> {
    Resolver::new().load(config)
}
