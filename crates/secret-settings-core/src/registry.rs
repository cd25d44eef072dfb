//! Registry of named store and fetcher factories
//!
//! Lookups go through two tiers: names registered by the caller (external)
//! win over the bundled built-ins, so an integrator can replace `json` or
//! `gsm` without touching this crate.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::config::ResolverConfig;
use crate::error::{Capability, SettingsError, SettingsResult};
use crate::fetchers::{FileFetcher, Fetcher};
use crate::stores::{EnvironmentStore, JsonStore, SettingsStore, SharedEnvironment};

/// Inputs available to a store factory
#[derive(Debug, Clone)]
pub struct StoreContext {
    /// Text returned by the fetcher, `None` when the URI names no fetcher
    pub data: Option<String>,
    /// The full configuration URI, for stores that want to do everything themselves
    pub config: String,
    /// Environment provider of the resolver
    pub environment: SharedEnvironment,
}

/// Inputs available to a fetcher factory
#[derive(Debug, Clone, Copy)]
pub struct FetcherContext<'a> {
    pub config: &'a ResolverConfig,
    pub environment: &'a SharedEnvironment,
}

/// Factory function type for creating stores
pub type StoreFactory =
    Arc<dyn Fn(StoreContext) -> SettingsResult<Box<dyn SettingsStore>> + Send + Sync>;

/// Factory function type for creating fetchers
pub type FetcherFactory =
    Arc<dyn Fn(FetcherContext<'_>) -> SettingsResult<Arc<dyn Fetcher>> + Send + Sync>;

/// Which tier a definition lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Registered by the caller; checked first
    External,
    /// Bundled with this crate
    Builtin,
}

/// Summary of a registered provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    pub name: String,
    pub description: String,
    pub tier: Tier,
}

#[derive(Clone)]
struct Definition<F> {
    description: String,
    factory: F,
}

#[derive(Clone)]
struct Tiered<F> {
    external: HashMap<String, Definition<F>>,
    builtin: HashMap<String, Definition<F>>,
}

impl<F: Clone> Tiered<F> {
    fn new() -> Self {
        Self {
            external: HashMap::new(),
            builtin: HashMap::new(),
        }
    }

    fn insert(&mut self, tier: Tier, name: &str, description: &str, factory: F) {
        let map = match tier {
            Tier::External => &mut self.external,
            Tier::Builtin => &mut self.builtin,
        };
        map.insert(
            name.to_lowercase(),
            Definition {
                description: description.to_string(),
                factory,
            },
        );
    }

    fn get(&self, name: &str) -> Option<F> {
        let key = name.to_lowercase();
        self.external
            .get(&key)
            .or_else(|| self.builtin.get(&key))
            .map(|def| def.factory.clone())
    }

    fn remove_external(&mut self, name: &str) -> bool {
        self.external.remove(&name.to_lowercase()).is_some()
    }

    fn contains(&self, name: &str) -> bool {
        let key = name.to_lowercase();
        self.external.contains_key(&key) || self.builtin.contains_key(&key)
    }

    fn list(&self) -> Vec<ProviderInfo> {
        let tiers = [(Tier::External, &self.external), (Tier::Builtin, &self.builtin)];
        let mut infos: Vec<ProviderInfo> = tiers
            .into_iter()
            .flat_map(|(tier, map)| {
                map.iter().map(move |(name, def)| ProviderInfo {
                    name: name.clone(),
                    description: def.description.clone(),
                    tier,
                })
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }
}

/// Named store and fetcher factories
///
/// # Example
///
/// ```
/// use secret_settings_core::registry::Registry;
/// use secret_settings_core::stores::JsonStore;
///
/// let mut registry = Registry::with_builtins();
/// registry.register_store("inline", "JSON embedded in the URI query", |ctx| {
///     let url = url::Url::parse(&ctx.config).map_err(|e| {
///         secret_settings_core::SettingsError::BadData(e.to_string())
///     })?;
///     Ok(Box::new(JsonStore::parse(url.query().unwrap_or("{}"))?))
/// });
/// assert!(registry.has_store("inline"));
/// ```
#[derive(Clone)]
pub struct Registry {
    stores: Tiered<StoreFactory>,
    fetchers: Tiered<FetcherFactory>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("stores", &self.list_stores())
            .field("fetchers", &self.list_fetchers())
            .finish()
    }
}

impl Registry {
    /// A registry with nothing in it
    pub fn empty() -> Self {
        Self {
            stores: Tiered::new(),
            fetchers: Tiered::new(),
        }
    }

    /// A registry holding the bundled stores and fetchers
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();

        registry.insert_store(
            Tier::Builtin,
            "environment",
            "Read settings from environment variables",
            |ctx| Ok(Box::new(EnvironmentStore::with_environment(ctx.environment))),
        );

        registry.insert_store(
            Tier::Builtin,
            "json",
            "Read settings from a fetched JSON object",
            |ctx| {
                let data = ctx.data.ok_or_else(|| {
                    SettingsError::BadData(
                        "json store needs data from a fetcher, e.g. json+gsm://...".to_string(),
                    )
                })?;
                Ok(Box::new(JsonStore::parse(&data)?))
            },
        );

        registry.insert_fetcher(
            Tier::Builtin,
            "file",
            "Read the payload from a local file",
            |_ctx| Ok(Arc::new(FileFetcher::new())),
        );

        #[cfg(feature = "gsm")]
        registry.insert_fetcher(
            Tier::Builtin,
            "gsm",
            "Read the payload from Google Secret Manager",
            |ctx| {
                let fetcher =
                    crate::fetchers::GsmFetcher::from_config(&ctx.config.gsm, ctx.environment.clone())?;
                Ok(Arc::new(fetcher))
            },
        );

        registry
    }

    fn insert_store<F>(&mut self, tier: Tier, name: &str, description: &str, factory: F)
    where
        F: Fn(StoreContext) -> SettingsResult<Box<dyn SettingsStore>> + Send + Sync + 'static,
    {
        self.stores.insert(tier, name, description, Arc::new(factory));
    }

    fn insert_fetcher<F>(&mut self, tier: Tier, name: &str, description: &str, factory: F)
    where
        F: Fn(FetcherContext<'_>) -> SettingsResult<Arc<dyn Fetcher>> + Send + Sync + 'static,
    {
        self.fetchers.insert(tier, name, description, Arc::new(factory));
    }

    /// Register a store factory in the external tier
    pub fn register_store<F>(&mut self, name: &str, description: &str, factory: F)
    where
        F: Fn(StoreContext) -> SettingsResult<Box<dyn SettingsStore>> + Send + Sync + 'static,
    {
        self.insert_store(Tier::External, name, description, factory);
    }

    /// Register a fetcher factory in the external tier
    pub fn register_fetcher<F>(&mut self, name: &str, description: &str, factory: F)
    where
        F: Fn(FetcherContext<'_>) -> SettingsResult<Arc<dyn Fetcher>> + Send + Sync + 'static,
    {
        self.insert_fetcher(Tier::External, name, description, factory);
    }

    /// Remove an externally registered store; built-ins stay
    pub fn unregister_store(&mut self, name: &str) -> bool {
        self.stores.remove_external(name)
    }

    /// Remove an externally registered fetcher; built-ins stay
    pub fn unregister_fetcher(&mut self, name: &str) -> bool {
        self.fetchers.remove_external(name)
    }

    pub fn has_store(&self, name: &str) -> bool {
        self.stores.contains(name)
    }

    pub fn has_fetcher(&self, name: &str) -> bool {
        self.fetchers.contains(name)
    }

    /// Find a store factory, external tier first
    pub fn store_factory(&self, name: &str) -> SettingsResult<StoreFactory> {
        self.stores
            .get(name)
            .ok_or_else(|| SettingsError::not_installed(Capability::Store, name))
    }

    /// Find a fetcher factory, external tier first
    pub fn fetcher_factory(&self, name: &str) -> SettingsResult<FetcherFactory> {
        self.fetchers
            .get(name)
            .ok_or_else(|| SettingsError::not_installed(Capability::Fetcher, name))
    }

    /// All stores, sorted by name
    pub fn list_stores(&self) -> Vec<ProviderInfo> {
        self.stores.list()
    }

    /// All fetchers, sorted by name
    pub fn list_fetchers(&self) -> Vec<ProviderInfo> {
        self.fetchers.list()
    }
}

/// Global registry of stores and fetchers
static REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::with_builtins()));

/// Register a store in the global registry
///
/// Must happen before `load` is called for the name to be found.
pub fn register_store<F>(name: &str, description: &str, factory: F)
where
    F: Fn(StoreContext) -> SettingsResult<Box<dyn SettingsStore>> + Send + Sync + 'static,
{
    REGISTRY.write().register_store(name, description, factory);
}

/// Register a fetcher in the global registry
pub fn register_fetcher<F>(name: &str, description: &str, factory: F)
where
    F: Fn(FetcherContext<'_>) -> SettingsResult<Arc<dyn Fetcher>> + Send + Sync + 'static,
{
    REGISTRY.write().register_fetcher(name, description, factory);
}

/// Remove a store from the global registry's external tier
pub fn unregister_store(name: &str) -> bool {
    REGISTRY.write().unregister_store(name)
}

/// Remove a fetcher from the global registry's external tier
pub fn unregister_fetcher(name: &str) -> bool {
    REGISTRY.write().unregister_fetcher(name)
}

pub fn has_store(name: &str) -> bool {
    REGISTRY.read().has_store(name)
}

pub fn has_fetcher(name: &str) -> bool {
    REGISTRY.read().has_fetcher(name)
}

pub fn list_stores() -> Vec<ProviderInfo> {
    REGISTRY.read().list_stores()
}

pub fn list_fetchers() -> Vec<ProviderInfo> {
    REGISTRY.read().list_fetchers()
}

/// Look up a store factory in the global registry
///
/// The lock is released before the factory is returned.
pub(crate) fn global_store_factory(name: &str) -> SettingsResult<StoreFactory> {
    REGISTRY.read().store_factory(name)
}

pub(crate) fn global_fetcher_factory(name: &str) -> SettingsResult<FetcherFactory> {
    REGISTRY.read().fetcher_factory(name)
}
