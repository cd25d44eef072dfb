//! Environment variable providers
//!
//! `EnvironmentStore` and the resolver never touch `std::env` directly; they
//! read through an `Environment` so tests and embedders can substitute one.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Source of environment variables
pub trait Environment: Send + Sync + fmt::Debug {
    /// Current value of `key`, or `None` when unset or not valid unicode
    fn var(&self, key: &str) -> Option<String>;
}

/// Type alias for a shared environment provider
pub type SharedEnvironment = Arc<dyn Environment>;

/// The real process environment, read on every call
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    pub fn new() -> Self {
        Self
    }

    /// A shared handle to the process environment
    pub fn shared() -> SharedEnvironment {
        Arc::new(Self)
    }
}

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment for tests and embedding
///
/// Mutations made after a store was built are visible to that store, the same
/// way changes to the process environment are.
///
/// # Example
///
/// ```
/// use secret_settings_core::stores::{Environment, MemoryEnvironment};
///
/// let env = MemoryEnvironment::new();
/// env.set("DEBUG", "on");
/// assert_eq!(env.var("DEBUG"), Some("on".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct MemoryEnvironment {
    vars: RwLock<HashMap<String, String>>,
}

impl MemoryEnvironment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment with initial variables
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: RwLock::new(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    /// Set a variable
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.write().insert(key.into(), value.into());
    }

    /// Remove a variable
    pub fn remove(&self, key: &str) -> Option<String> {
        self.vars.write().remove(key)
    }

    /// Remove every variable
    pub fn clear(&self) {
        self.vars.write().clear();
    }

    pub fn len(&self) -> usize {
        self.vars.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for MemoryEnvironment {
    fn clone(&self) -> Self {
        Self {
            vars: RwLock::new(self.vars.read().clone()),
        }
    }
}

impl Environment for MemoryEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.read().get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_environment_crud() {
        let env = MemoryEnvironment::new();
        assert!(env.is_empty());
        assert_eq!(env.var("KEY"), None);

        env.set("KEY", "value");
        assert_eq!(env.len(), 1);
        assert_eq!(env.var("KEY"), Some("value".to_string()));

        env.set("KEY", "new_value");
        assert_eq!(env.var("KEY"), Some("new_value".to_string()));

        assert_eq!(env.remove("KEY"), Some("new_value".to_string()));
        assert!(env.is_empty());
    }

    #[test]
    fn test_memory_environment_with_vars() {
        let env = MemoryEnvironment::with_vars([("A", "1"), ("B", "2")]);
        assert_eq!(env.len(), 2);
        assert_eq!(env.var("B"), Some("2".to_string()));

        env.clear();
        assert!(env.is_empty());
    }

    #[test]
    fn test_memory_environment_clone_is_independent() {
        let env = MemoryEnvironment::with_vars([("KEY", "value")]);
        let cloned = env.clone();
        cloned.set("KEY", "modified");
        assert_eq!(env.var("KEY"), Some("value".to_string()));
        assert_eq!(cloned.var("KEY"), Some("modified".to_string()));
    }

    #[test]
    fn test_process_environment_reads_missing() {
        let env = ProcessEnvironment::new();
        assert_eq!(env.var("SECRET_SETTINGS_SURELY_UNSET_XYZ"), None);
    }

    #[test]
    fn test_memory_environment_thread_safety() {
        use std::thread;

        let env = Arc::new(MemoryEnvironment::new());
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let env = Arc::clone(&env);
                thread::spawn(move || {
                    let key = format!("KEY_{i}");
                    env.set(key.clone(), i.to_string());
                    assert_eq!(env.var(&key), Some(i.to_string()));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(env.len(), 10);
    }
}
