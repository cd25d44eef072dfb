//! Core trait for typed settings access

use serde_json::{Map, Value};

use super::coerce::Coercion;
use crate::error::{SettingsError, SettingsResult};

/// Strings that `get_bool` reads as `true` (compared case-insensitively)
pub const TRUTHY_TOKENS: [&str; 4] = ["true", "yes", "on", "1"];

/// Trait for typed, read-only settings stores
///
/// Every store answers the same four questions about a key. The coercion
/// and presence rules are store-specific and documented on each
/// implementation:
/// - Process environment (`EnvironmentStore`)
/// - A decoded JSON object (`JsonStore`)
/// - Custom implementations registered with the resolver
///
/// # Example
///
/// ```
/// use secret_settings_core::stores::{SettingsStore, JsonStore};
///
/// let store = JsonStore::parse(r#"{"debug": "yes", "hosts": ["a", "b"]}"#).unwrap();
/// assert!(store.get_bool("debug", false).unwrap());
/// assert_eq!(store.get_array("hosts", None).unwrap().unwrap().len(), 2);
/// ```
pub trait SettingsStore: Send + Sync + std::fmt::Debug {
    /// Short name of the store type (the URI scheme it is registered under)
    fn name(&self) -> &str;

    /// Get the raw value for `key`, falling back to `default`
    ///
    /// When `coerce` is given it is applied to whichever value resolved.
    /// `Coercion::Bool` is always rejected with `SettingsError::DoNotCoerceBool`.
    fn get_value(
        &self,
        key: &str,
        default: Option<Value>,
        coerce: Option<&Coercion>,
    ) -> SettingsResult<Option<Value>>;

    /// Get a boolean, reading strings through `TRUTHY_TOKENS`
    fn get_bool(&self, key: &str, default: bool) -> SettingsResult<bool>;

    /// Get a mapping; a present value or default that is not a mapping is an error
    fn get_mapping(
        &self,
        key: &str,
        default: Option<Value>,
    ) -> SettingsResult<Option<Map<String, Value>>>;

    /// Get a non-string sequence; strings are rejected
    fn get_array(&self, key: &str, default: Option<Value>) -> SettingsResult<Option<Vec<Value>>>;
}

/// Convenience accessors built on top of `get_value`
pub trait SettingsStoreExt: SettingsStore {
    /// Get a value rendered as a string
    fn get_string(&self, key: &str) -> SettingsResult<Option<String>> {
        Ok(self
            .get_value(key, None, Some(&Coercion::Str))?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    /// Get a value converted to an integer
    fn get_i64(&self, key: &str) -> SettingsResult<Option<i64>> {
        Ok(self
            .get_value(key, None, Some(&Coercion::Int))?
            .and_then(|v| v.as_i64()))
    }

    /// Get a value converted to a float
    fn get_f64(&self, key: &str) -> SettingsResult<Option<f64>> {
        Ok(self
            .get_value(key, None, Some(&Coercion::Float))?
            .and_then(|v| v.as_f64()))
    }
}

impl<T: SettingsStore + ?Sized> SettingsStoreExt for T {}

/// Whether `text` is one of the truthy tokens
pub fn is_truthy(text: &str) -> bool {
    let lower = text.to_lowercase();
    TRUTHY_TOKENS.contains(&lower.as_str())
}

/// Apply an optional coercion to a resolved value
pub(crate) fn finish_value(
    resolved: Option<Value>,
    coerce: Option<&Coercion>,
) -> SettingsResult<Option<Value>> {
    match (resolved, coerce) {
        (Some(value), Some(coercion)) => coercion.apply(value).map(Some),
        (resolved, _) => Ok(resolved),
    }
}

/// Reject `Coercion::Bool` before any lookup happens
pub(crate) fn reject_bool(coerce: Option<&Coercion>) -> SettingsResult<()> {
    if matches!(coerce, Some(Coercion::Bool)) {
        return Err(SettingsError::DoNotCoerceBool);
    }
    Ok(())
}

pub(crate) fn expect_mapping(
    key: &str,
    resolved: Option<Value>,
) -> SettingsResult<Option<Map<String, Value>>> {
    match resolved {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(SettingsError::type_mismatch(key, "mapping type")),
    }
}

pub(crate) fn expect_array(key: &str, resolved: Option<Value>) -> SettingsResult<Option<Vec<Value>>> {
    match resolved {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(SettingsError::type_mismatch(key, "non-string sequence type")),
    }
}
