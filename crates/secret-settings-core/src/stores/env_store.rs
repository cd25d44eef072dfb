//! Environment variable settings store

use std::sync::Arc;

use serde_json::{Map, Value};

use super::coerce::Coercion;
use super::environment::{ProcessEnvironment, SharedEnvironment};
use super::traits::{
    expect_array, expect_mapping, finish_value, is_truthy, reject_bool, SettingsStore,
};
use crate::error::{SettingsError, SettingsResult};

/// Settings store that reads environment variables
///
/// Variables are read on every call, never snapshotted, so changes made after
/// the store was built are observed. An empty variable counts as unset.
///
/// Values are always strings. `get_mapping` and `get_array` parse the string
/// as JSON first, and `get_bool` reads it through the truthy token set.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use secret_settings_core::stores::{EnvironmentStore, MemoryEnvironment, SettingsStore};
///
/// let env = Arc::new(MemoryEnvironment::with_vars([("ALLOWED_HOSTS", r#"["a.example"]"#)]));
/// let store = EnvironmentStore::with_environment(env);
///
/// let hosts = store.get_array("ALLOWED_HOSTS", None).unwrap().unwrap();
/// assert_eq!(hosts[0], "a.example");
/// ```
#[derive(Debug, Clone)]
pub struct EnvironmentStore {
    env: SharedEnvironment,
}

impl Default for EnvironmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentStore {
    /// Create a store over the process environment
    pub fn new() -> Self {
        Self {
            env: Arc::new(ProcessEnvironment),
        }
    }

    /// Create a store over a custom environment provider
    pub fn with_environment(env: SharedEnvironment) -> Self {
        Self { env }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.env.var(key).filter(|value| !value.is_empty())
    }

    /// Parse the variable as JSON, or fall back to the default
    fn lookup_json(&self, key: &str, default: Option<Value>) -> SettingsResult<Option<Value>> {
        match self.lookup(key) {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| SettingsError::MalformedData {
                    context: format!("environment variable [{key}]"),
                    source,
                }),
            None => Ok(default),
        }
    }
}

impl SettingsStore for EnvironmentStore {
    fn name(&self) -> &str {
        "environment"
    }

    fn get_value(
        &self,
        key: &str,
        default: Option<Value>,
        coerce: Option<&Coercion>,
    ) -> SettingsResult<Option<Value>> {
        reject_bool(coerce)?;
        let resolved = self.lookup(key).map(Value::String).or(default);
        finish_value(resolved, coerce)
    }

    fn get_bool(&self, key: &str, default: bool) -> SettingsResult<bool> {
        Ok(self.lookup(key).map_or(default, |text| is_truthy(&text)))
    }

    fn get_mapping(
        &self,
        key: &str,
        default: Option<Value>,
    ) -> SettingsResult<Option<Map<String, Value>>> {
        let resolved = self.lookup_json(key, default)?;
        expect_mapping(key, resolved)
    }

    fn get_array(&self, key: &str, default: Option<Value>) -> SettingsResult<Option<Vec<Value>>> {
        let resolved = self.lookup_json(key, default)?;
        expect_array(key, resolved)
    }
}
