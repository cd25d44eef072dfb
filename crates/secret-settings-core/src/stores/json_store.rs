//! JSON document settings store

use std::str::FromStr;

use serde_json::{Map, Value};

use super::coerce::Coercion;
use super::traits::{
    expect_array, expect_mapping, finish_value, is_truthy, reject_bool, SettingsStore,
};
use crate::error::{SettingsError, SettingsResult};

/// A settings store created from a JSON encoded object
///
/// The document is decoded once at construction and never re-parsed. A key is
/// present when the object has it, whatever its value; a stored `{}` or `[]`
/// is returned as-is rather than replaced by the default. A stored `null` is
/// treated as absent by `get_bool`, `get_mapping` and `get_array`.
///
/// # Example
///
/// ```
/// use secret_settings_core::stores::{JsonStore, SettingsStore};
///
/// let store = JsonStore::parse(r#"{"database": {"host": "db"}}"#).unwrap();
/// let db = store.get_mapping("database", None).unwrap().unwrap();
/// assert_eq!(db["host"], "db");
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonStore {
    data: Map<String, Value>,
}

impl JsonStore {
    /// Decode `encoded` and build a store from it
    ///
    /// Fails with `MalformedData` for invalid JSON and `BadData` when the
    /// root is not an object.
    pub fn parse(encoded: &str) -> SettingsResult<Self> {
        let value: Value =
            serde_json::from_str(encoded).map_err(|source| SettingsError::MalformedData {
                context: "JSON store data".to_string(),
                source,
            })?;
        Self::from_value(value)
    }

    /// Build a store from an already decoded document
    pub fn from_value(value: Value) -> SettingsResult<Self> {
        match value {
            Value::Object(data) => Ok(Self { data }),
            _ => Err(SettingsError::BadData(
                "Data must be a JSON dictionary".to_string(),
            )),
        }
    }

    /// The decoded document
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Keys stored in the document
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    fn present(&self, key: &str) -> Option<&Value> {
        self.data.get(key).filter(|value| !value.is_null())
    }
}

impl FromStr for JsonStore {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl SettingsStore for JsonStore {
    fn name(&self) -> &str {
        "json"
    }

    fn get_value(
        &self,
        key: &str,
        default: Option<Value>,
        coerce: Option<&Coercion>,
    ) -> SettingsResult<Option<Value>> {
        reject_bool(coerce)?;
        let resolved = self.data.get(key).cloned().or(default);
        finish_value(resolved, coerce)
    }

    fn get_bool(&self, key: &str, default: bool) -> SettingsResult<bool> {
        match self.present(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(text)) => Ok(is_truthy(text)),
            Some(_) => Err(SettingsError::type_mismatch(key, "boolean or boolean string")),
        }
    }

    fn get_mapping(
        &self,
        key: &str,
        default: Option<Value>,
    ) -> SettingsResult<Option<Map<String, Value>>> {
        let resolved = self.present(key).cloned().or(default);
        expect_mapping(key, resolved)
    }

    fn get_array(&self, key: &str, default: Option<Value>) -> SettingsResult<Option<Vec<Value>>> {
        let resolved = self.present(key).cloned().or(default);
        expect_array(key, resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(data: &str) -> JsonStore {
        JsonStore::parse(data).unwrap()
    }

    #[test]
    fn test_empty_object_returns_defaults() {
        let store = store("{}");
        assert_eq!(store.name(), "json");
        assert_eq!(store.get_value("k", Some(json!("dflt")), None).unwrap(), Some(json!("dflt")));
    }

    #[test]
    fn test_fails_with_bad_json() {
        for data in [
            r#"{"key: "foo"}"#,
            "{]",
            "unquoted text",
            r#"{"key": "bar" // comments not allowed}"#,
        ] {
            assert!(
                matches!(JsonStore::parse(data), Err(SettingsError::MalformedData { .. })),
                "{data} should not parse"
            );
        }
    }

    #[test]
    fn test_fails_with_bad_data() {
        for data in ["1", r#""quoted text""#, "[1,2,3]", "null"] {
            assert!(
                matches!(JsonStore::parse(data), Err(SettingsError::BadData(_))),
                "{data} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_str() {
        let store: JsonStore = r#"{"a": 1}"#.parse().unwrap();
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_value_returned_if_present() {
        let cases = [
            (r#"{"key": "foo"}"#, json!("foo")),
            (r#"{"key": true}"#, json!(true)),
            (r#"{"key": false}"#, json!(false)),
            (r#"{"key": "bar", "k2": "foo"}"#, json!("bar")),
        ];
        for (data, expected) in cases {
            let store = store(data);
            assert_eq!(store.get_value("key", None, None).unwrap(), Some(expected.clone()));
            assert_eq!(
                store
                    .get_value("key", Some(json!("should not be returned")), None)
                    .unwrap(),
                Some(expected)
            );
            assert_eq!(
                store.get_value("non-key", Some(json!("dflt")), None).unwrap(),
                Some(json!("dflt"))
            );
        }
    }

    #[test]
    fn test_none_returned_if_no_key_or_default() {
        let store = store(r#"{"key": "foo"}"#);
        assert_eq!(store.get_value("key2", None, None).unwrap(), None);
    }

    #[test]
    fn test_bool_coerce_throws_error() {
        let store = store(r#"{"key": "foo"}"#);
        assert!(matches!(
            store.get_value("key", None, Some(&Coercion::Bool)),
            Err(SettingsError::DoNotCoerceBool)
        ));
    }

    #[test]
    fn test_coerce_works() {
        let store = store(r#"{"n": 10, "s": "11", "l": "list"}"#);
        assert_eq!(store.get_value("n", None, Some(&Coercion::Str)).unwrap(), Some(json!("10")));
        assert_eq!(store.get_value("s", None, Some(&Coercion::Int)).unwrap(), Some(json!(11)));
        assert_eq!(
            store.get_value("l", None, Some(&Coercion::List)).unwrap(),
            Some(json!(["l", "i", "s", "t"]))
        );
    }

    #[test]
    fn test_coerce_throws_error() {
        let store = store(r#"{"nan": "nan", "nine": 9, "list": [1,2,3]}"#);
        assert!(store.get_value("nan", None, Some(&Coercion::Int)).is_err());
        assert!(store.get_value("nine", None, Some(&Coercion::List)).is_err());
        assert!(store.get_value("list", None, Some(&Coercion::Float)).is_err());
    }

    #[test]
    fn test_bool_values() {
        assert!(store(r#"{"key": true}"#).get_bool("key", false).unwrap());
        assert!(!store(r#"{"key": false}"#).get_bool("key", true).unwrap());
        assert!(store(r#"{"key": "Yes"}"#).get_bool("key", false).unwrap());
        assert!(!store(r#"{"key": "false"}"#).get_bool("key", true).unwrap());
    }

    #[test]
    fn test_bool_default_ok() {
        let empty = store("{}");
        assert!(empty.get_bool("non-key", true).unwrap());
        assert!(!empty.get_bool("non-key", false).unwrap());

        let null = store(r#"{"key": null}"#);
        assert!(null.get_bool("key", true).unwrap());
    }

    #[test]
    fn test_non_bool_raises_error() {
        for data in [r#"{"key": 1}"#, r#"{"key": [1,2,3]}"#, r#"{"key": {"k2": 4}}"#] {
            assert!(
                matches!(store(data).get_bool("key", false), Err(SettingsError::TypeMismatch { .. })),
                "{data} should not be a bool"
            );
        }
    }

    #[test]
    fn test_map_returned() {
        let store = store(r#"{"key": {"map_key": 100}}"#);
        let value = store.get_mapping("key", None).unwrap().unwrap();
        assert_eq!(value["map_key"], json!(100));
    }

    #[test]
    fn test_empty_map_is_not_replaced_by_default() {
        let store = store(r#"{"key": {}}"#);
        let value = store.get_mapping("key", Some(json!({"d": 1}))).unwrap().unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn test_missing_map_key_returns_none() {
        let store = store("{}");
        assert!(store.get_mapping("non-key", None).unwrap().is_none());
    }

    #[test]
    fn test_non_map_default_raises_error() {
        let store = store("{}");
        assert!(matches!(
            store.get_mapping("key", Some(json!([1, 2, 3]))),
            Err(SettingsError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_non_mapping_raises_error() {
        for data in [
            r#"{"key": "text"}"#,
            r#"{"key": 20}"#,
            r#"{"key": [1,2,3]}"#,
            r#"{"key": true}"#,
            r#"{"key": ""}"#,
        ] {
            assert!(
                matches!(store(data).get_mapping("key", None), Err(SettingsError::TypeMismatch { .. })),
                "{data} should not be a mapping"
            );
        }
    }

    #[test]
    fn test_list_returned() {
        let store = store(r#"{"key": [1,2,3]}"#);
        let value = store.get_array("key", None).unwrap().unwrap();
        assert_eq!(value, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_missing_list_key_returns_none() {
        let store = store("{}");
        assert!(store.get_array("non-key", None).unwrap().is_none());
    }

    #[test]
    fn test_non_list_default_raises_error() {
        let store = store("{}");
        assert!(matches!(
            store.get_array("key", Some(json!("non list"))),
            Err(SettingsError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_non_array_raises_error() {
        for data in [
            r#"{"key": "text"}"#,
            r#"{"key": 20}"#,
            r#"{"key": {"mk": [2,3]}}"#,
            r#"{"key": true}"#,
        ] {
            assert!(
                matches!(store(data).get_array("key", None), Err(SettingsError::TypeMismatch { .. })),
                "{data} should not be an array"
            );
        }
    }
}
